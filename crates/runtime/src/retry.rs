use std::time::Duration;

/// Bounded exponential backoff for network requests.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// Delay before retrying after the zero-indexed attempt.
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        let exp = 2u32.saturating_pow(attempt);

        self.base_delay.saturating_mul(exp).min(self.max_delay)
    }
}
