//! Retry policy for outbound requests
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 429 | Retry with backoff |
//! | HTTP 5xx | Retry with backoff |
//! | Timeout | Retry with backoff |
//! | Other HTTP error (404, 403, ...) | Immediate failure |
//! | Connection refused / DNS / TLS | Immediate failure |

use crate::config::FetchConfig;
use reqwest::StatusCode;
use std::time::Duration;

/// Exponential backoff policy applied to idempotent GET requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.backoff_base_ms),
        )
    }

    /// Delay before retry number `retry` (1-based): `base * 2^(retry - 1)`
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Returns true if another retry is allowed after `retries_done` retries
    pub fn allows_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }

    /// Returns true for statuses worth retrying: 429 and every 5xx
    pub fn is_transient_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}
