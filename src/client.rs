//! Hub client: the rate-limited query/response pipeline.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::HubConfig;
use crate::error::{HubError, HubResult};
use crate::operation::{GraphqlResponse, QueryRequest};
use crate::ratelimit::{RateLimitError, TokenBucket};

/// Client for one GraphQL hub endpoint.
///
/// Each instance owns its configuration and rate limiter exclusively; two
/// clients never share a rate budget. The client may be shared across tasks:
/// every call runs the same linear pipeline, and the token bucket is the
/// only state touched by concurrent calls.
#[derive(Debug)]
pub struct HubClient {
    endpoint: String,
    http: reqwest::Client,
    limiter: Option<TokenBucket>,
}

impl HubClient {
    /// Create a client from configuration.
    pub fn new(config: &HubConfig) -> HubResult<Self> {
        let limiter = if config.rate_limited {
            if config.burst_capacity == 0 {
                return Err(RateLimitError::InvalidConfig(
                    "burst capacity must be at least 1".into(),
                )
                .into());
            }
            if config.refill_interval.is_zero() {
                return Err(RateLimitError::InvalidConfig(
                    "refill interval must be non-zero".into(),
                )
                .into());
            }
            Some(TokenBucket::new(
                config.burst_capacity,
                config.refill_interval,
            ))
        } else {
            None
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
            limiter,
        })
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one query and decode the response data into `T`.
    ///
    /// Waits for rate-limiter admission, POSTs the `{query, variables}`
    /// body, and decodes the `{data, errors}` envelope. A non-empty `errors`
    /// array fails the call with the first reported message even when `data`
    /// is present.
    ///
    /// The admission wait is unbounded; wrap the returned future in
    /// `tokio::time::timeout` (or drop it) to cancel. The HTTP round trip
    /// itself is bounded by the configured timeout.
    pub async fn execute<T: DeserializeOwned>(&self, request: QueryRequest) -> HubResult<T> {
        if request.query.is_empty() {
            return Err(HubError::EmptyQuery);
        }

        if let Some(limiter) = &self.limiter {
            let waited = limiter.acquire(Duration::MAX).await?;
            debug!(waited_ms = waited.as_millis(), "rate limiter admission");
        }

        let body =
            serde_json::to_vec(&request).map_err(|err| HubError::Serialize(err.to_string()))?;

        debug!(endpoint = %self.endpoint, "dispatching GraphQL query");
        let response = self.http.post(&self.endpoint).body(body).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(HubError::HttpStatus { status });
        }

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "received GraphQL response");

        let envelope: GraphqlResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|err| HubError::Deserialize(err.to_string()))?;

        if let Some(first) = envelope.errors.first() {
            return Err(HubError::Graphql {
                message: first.message.clone(),
            });
        }

        envelope.data.ok_or(HubError::MissingData)
    }
}
