//! List the first page of governance spaces on the Snapshot hub.
//!
//! Run with `cargo run --example spaces`.

use serde::Deserialize;
use snaphub::{HubClient, HubConfig, QueryRequest};

const SPACES_QUERY: &str = r"
query Spaces($first: Int, $skip: Int) {
  spaces(
    first: $first,
    skip: $skip
  ) {
    id
    name
    about
    twitter
    github
  }
}
";

#[derive(Debug, Deserialize)]
struct SpacesData {
    spaces: Vec<Space>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Space {
    id: String,
    name: Option<String>,
    about: Option<String>,
    twitter: Option<String>,
    github: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = HubClient::new(&HubConfig::default())?;

    let request = QueryRequest::new(SPACES_QUERY)
        .with_variable("first", 20)?
        .with_variable("skip", 0)?;

    let data: SpacesData = client.execute(request).await?;

    for space in &data.spaces {
        println!("{} ({})", space.id, space.name.as_deref().unwrap_or("-"));
    }

    Ok(())
}
