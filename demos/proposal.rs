//! Fetch a single governance proposal from the Snapshot hub.
//!
//! Run with `cargo run --example proposal`.

use serde::Deserialize;
use snaphub::{HubClient, HubConfig, QueryRequest};

const PROPOSAL_QUERY: &str = r"
query Proposal($id: String!) {
  proposal(
    id: $id
  ) {
    id
    title
    body
    state
    author
    space {
      id
      name
    }
  }
}
";

const PROPOSAL_ID: &str = "0x586de5bf366820c4369c041b0bbad2254d78fafe1dcc1528c1ed661bb4dfb671";

#[derive(Debug, Deserialize)]
struct ProposalData {
    proposal: Proposal,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Proposal {
    id: String,
    title: String,
    body: String,
    state: Option<String>,
    author: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = HubClient::new(&HubConfig::default())?;

    let request = QueryRequest::new(PROPOSAL_QUERY).with_variable("id", PROPOSAL_ID)?;

    let data: ProposalData = client.execute(request).await?;

    println!("{}: {}", data.proposal.id, data.proposal.title);
    println!("{}", data.proposal.body);

    Ok(())
}
