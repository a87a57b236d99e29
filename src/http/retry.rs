//! Retry policy for transient failures

use std::time::Duration;

use http::StatusCode;

/// Configuration for retry behavior.
///
/// `retries` counts additional attempts beyond the first, so total attempts
/// are `1 + retries`. The delay before retry `n` (1-based) is
/// `base_delay * 2^(n-1)` with backoff enabled, or a flat `base_delay`
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts beyond the first.
    pub retries: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Double the delay on every further retry.
    pub backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            base_delay: Duration::from_millis(500),
            backoff: true,
        }
    }
}

impl RetryPolicy {
    /// Total attempts the policy allows, including the first.
    pub fn total_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Whether a received status is worth another attempt.
    ///
    /// Server-side and transient failures (5xx, 429) are retryable; client
    /// errors are not. Network-level failures are classified by the attempt
    /// loop instead, since a cancellation is never retryable.
    pub fn is_retryable_status(status: StatusCode) -> bool {
        status.as_u16() >= 500 || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Delay before retry `attempt_index` (1-based: 1 is the first retry).
    pub fn delay(&self, attempt_index: u32) -> Duration {
        if !self.backoff {
            return self.base_delay;
        }
        let exponent = attempt_index.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}
