//! Error types for the hub client.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ratelimit::RateLimitError;

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

/// Error type for hub query operations.
///
/// Every failure of [`HubClient::execute`](crate::HubClient::execute) maps to
/// exactly one variant; nothing is retried or recovered internally.
#[derive(Debug, Clone, Error)]
pub enum HubError {
    /// The query text was empty; no request was dispatched.
    #[error("query text must not be empty")]
    EmptyQuery,

    /// Rate limiter admission failed.
    #[error("rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    /// A request value could not be encoded to JSON.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0:?}")]
    Http(HttpErrorInfo),

    /// Response received with a non-200 status; the body is never parsed.
    #[error("failed to fetch data: {status}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
    },

    /// Response body did not parse as a GraphQL envelope.
    #[error("deserialization error: {0}")]
    Deserialize(String),

    /// Envelope parsed but carried neither data nor errors.
    #[error("response contained no GraphQL data")]
    MissingData,

    /// The server reported at least one GraphQL error; only the first
    /// message is carried.
    #[error("graphql error: {message}")]
    Graphql {
        /// First server-reported message.
        message: String,
    },
}

impl From<reqwest::Error> for HubError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl HubError {
    /// Returns `true` for failures a caller may reasonably retry.
    ///
    /// The client itself never retries; this only informs caller policy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(info) => info.is_timeout || info.is_connect,
            Self::HttpStatus { status } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Result type for hub operations.
pub type HubResult<T> = Result<T, HubError>;
