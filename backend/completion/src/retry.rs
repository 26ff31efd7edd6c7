use std::time::Duration;

/// Bounded retry for transport failures that may succeed on a second try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each further one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor)
    }

    pub fn should_retry(&self, attempt: u32, err: &reqwest::Error) -> bool {
        attempt < self.max_retries && is_transient(err)
    }
}

/// Connect failures and timeouts are worth retrying. Anything that got an
/// HTTP response back is not.
pub fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
