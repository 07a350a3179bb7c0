//! Token bucket rate limiter gating outbound request dispatch.
//!
//! Tokens accumulate at a fixed rate of one per refill interval, capped at
//! the bucket capacity. Each admitted request consumes one token.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::sleep;

/// Rate limiter error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    /// Wait time would exceed the maximum allowed.
    #[error("wait time {wait_time:?} exceeds maximum {max_wait:?}")]
    WaitExceeded {
        /// Required wait time.
        wait_time: Duration,
        /// Maximum allowed wait.
        max_wait: Duration,
    },

    /// Invalid limiter configuration.
    #[error("invalid rate limit configuration: {0}")]
    InvalidConfig(String),
}

/// Token bucket rate limiter.
///
/// A fresh bucket starts full, so the first `capacity` acquisitions are
/// admitted immediately (the burst allowance). Refill preserves phase while
/// the bucket is below capacity: the last-refill instant advances by whole
/// refill periods rather than jumping to the current time, so a partial
/// interval keeps counting toward the next token. Time spent at capacity
/// accrues nothing.
pub struct TokenBucket {
    /// Maximum tokens (bucket capacity).
    capacity: u32,

    /// Time to accrue one token.
    refill_interval: Duration,

    /// Current token count, always in `[0, capacity]`.
    tokens: AtomicU32,

    /// Start of the current refill period.
    last_refill: Mutex<Instant>,
}

impl TokenBucket {
    /// Create a new token bucket, initially full.
    #[must_use]
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
            tokens: AtomicU32::new(capacity),
            last_refill: Mutex::new(Instant::now()),
        }
    }

    /// Credit tokens for elapsed whole refill periods.
    fn refill(&self) {
        let mut last_refill = self.last_refill.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(*last_refill);

        if elapsed < self.refill_interval {
            return;
        }

        let periods: u32 = (elapsed.as_nanos() / self.refill_interval.as_nanos())
            .try_into()
            .unwrap_or(u32::MAX);

        // Add tokens up to capacity; CAS loop so a concurrent try_acquire
        // cannot be lost.
        let before = loop {
            let current = self.tokens.load(Ordering::Acquire);
            let new_tokens = current.saturating_add(periods).min(self.capacity);

            if new_tokens == current {
                break current;
            }

            if self
                .tokens
                .compare_exchange(current, new_tokens, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break current;
            }
        };

        // Every accrued period was credited: keep the sub-interval phase
        // remainder. Otherwise the bucket topped out and time spent full is
        // forfeited, so the period restarts now.
        if before.saturating_add(periods) <= self.capacity {
            *last_refill += self.refill_interval * periods;
        } else {
            *last_refill = now;
        }
    }

    /// Try to consume one token without blocking.
    ///
    /// Returns `false` if no token is available.
    pub fn try_acquire(&self) -> bool {
        self.refill();

        loop {
            let current = self.tokens.load(Ordering::Acquire);
            if current == 0 {
                return false;
            }

            if self
                .tokens
                .compare_exchange(current, current - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    /// Consume one token, sleeping until one accrues.
    ///
    /// Returns the time waited, or [`RateLimitError::WaitExceeded`] if the
    /// next wait would pass `max_wait`. Dropping the returned future (for
    /// example inside `tokio::time::timeout`) aborts the wait and consumes
    /// no token.
    pub async fn acquire(&self, max_wait: Duration) -> Result<Duration, RateLimitError> {
        let start = Instant::now();

        loop {
            if self.try_acquire() {
                return Ok(start.elapsed());
            }

            let wait_time = self.wait_time();
            let total_waited = start.elapsed();

            if total_waited.saturating_add(wait_time) > max_wait {
                return Err(RateLimitError::WaitExceeded {
                    wait_time: total_waited.saturating_add(wait_time),
                    max_wait,
                });
            }

            sleep(wait_time).await;
        }
    }

    /// Current token count.
    pub fn remaining(&self) -> u32 {
        self.tokens.load(Ordering::Acquire)
    }

    /// Time until the next token accrues, zero if one is available now.
    pub fn wait_time(&self) -> Duration {
        if self.tokens.load(Ordering::Acquire) > 0 {
            return Duration::ZERO;
        }

        let last_refill = *self.last_refill.lock();
        let elapsed = Instant::now().duration_since(last_refill);
        self.refill_interval.saturating_sub(elapsed)
    }
}

impl std::fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket")
            .field("capacity", &self.capacity)
            .field("refill_interval", &self.refill_interval)
            .field("tokens", &self.tokens.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
