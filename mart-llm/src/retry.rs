//! Retry policy for transient API failures.
//!
//! HTTP 503 and 429 (and per-attempt timeouts) are retried with
//! exponential backoff: with the defaults the waits are 1s, 2s, 4s.
//! Every other failure is returned to the caller immediately.

use std::time::Duration;

use mart_core::config::LlmConfig;
use reqwest::StatusCode;

/// How many times and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry; doubles each time.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Build from the `[llm]` config section.
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        }
    }

    /// No retries at all.
    #[must_use]
    pub fn none() -> Self {
        Self { max_retries: 0, initial_backoff: Duration::ZERO }
    }

    /// Total attempts including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1u32 << exp)
    }

    /// Whether a response status is worth another attempt.
    #[must_use]
    pub fn is_retryable(status: StatusCode) -> bool {
        status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::TOO_MANY_REQUESTS
    }
}
