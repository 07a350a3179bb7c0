//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`HubClient`](crate::HubClient).
///
/// One value per client instance; clients never share rate budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Target GraphQL HTTP endpoint (default: <https://hub.snapshot.org/graphql>)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whether outbound requests pass through the token bucket
    #[serde(default = "default_rate_limited")]
    pub rate_limited: bool,

    /// Time between token replenishments
    #[serde(default = "default_refill_interval", with = "duration_secs")]
    pub refill_interval: Duration,

    /// Maximum tokens that can accumulate
    #[serde(default = "default_burst_capacity")]
    pub burst_capacity: u32,

    /// Per-call HTTP deadline
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_endpoint() -> String {
    "https://hub.snapshot.org/graphql".into()
}

const fn default_rate_limited() -> bool {
    true
}

const fn default_refill_interval() -> Duration {
    Duration::from_secs(2)
}

const fn default_burst_capacity() -> u32 {
    1
}

const fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            rate_limited: default_rate_limited(),
            refill_interval: default_refill_interval(),
            burst_capacity: default_burst_capacity(),
            timeout: default_timeout(),
        }
    }
}

impl HubConfig {
    /// Configuration pointed at a custom endpoint, defaults otherwise.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Disable the rate limiter.
    #[must_use]
    pub const fn unlimited(mut self) -> Self {
        self.rate_limited = false;
        self
    }

    /// Set the token refill interval.
    #[must_use]
    pub const fn with_refill_interval(mut self, interval: Duration) -> Self {
        self.refill_interval = interval;
        self
    }

    /// Set the burst capacity.
    #[must_use]
    pub const fn with_burst_capacity(mut self, capacity: u32) -> Self {
        self.burst_capacity = capacity;
        self
    }

    /// Set the per-call HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
