//! Snaphub - Rate-limited GraphQL client for the Snapshot governance hub.
//!
//! This crate provides:
//! - A token-bucket rate limiter gating outbound request dispatch.
//! - A typed query pipeline: serialize, POST, decode the `{data, errors}`
//!   envelope into a caller-chosen result shape.
//! - Layered error classification separating transport failures from
//!   GraphQL-level errors.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use serde::Deserialize;
//! use snaphub::{HubClient, HubConfig, QueryRequest};
//!
//! #[derive(Deserialize)]
//! struct SpacesData {
//!     spaces: Vec<Space>,
//! }
//!
//! #[derive(Deserialize)]
//! struct Space {
//!     id: String,
//! }
//!
//! let client = HubClient::new(&HubConfig::default())?;
//! let request = QueryRequest::new("query { spaces(first: 1) { id } }");
//! let data: SpacesData = client.execute(request).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod client;
mod config;
mod error;
mod operation;
mod ratelimit;

pub use client::HubClient;
pub use config::HubConfig;
pub use error::{HttpErrorInfo, HubError, HubResult};
pub use operation::{GraphqlError, GraphqlResponse, QueryRequest};
pub use ratelimit::{RateLimitError, TokenBucket};
