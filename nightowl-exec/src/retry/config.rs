use std::time::Duration;

use nightowl_core::RetrySettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Attempts per job, the first one included. `None` retries forever.
    pub max_attempts: Option<usize>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(4),
            max_attempts: None,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(s: &RetrySettings) -> Self {
        Self {
            min_delay: Duration::from_secs(s.delay_secs.min()),
            max_delay: Duration::from_secs(s.delay_secs.max()),
            max_attempts: s.max_attempts,
        }
    }
}
