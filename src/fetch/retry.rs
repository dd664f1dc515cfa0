//! Retry policy and exponential backoff

use std::time::Duration;

/// Attempts per request unless the caller says otherwise
pub const DEFAULT_RETRIES: u32 = 3;

/// Per-attempt deadline unless the caller says otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounds on how often and how patiently a request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub retries: u32,
    /// Deadline for each individual attempt
    pub timeout: Duration,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Ceiling for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (zero-based):
    /// `min(base_delay * 2^attempt, max_delay)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}
