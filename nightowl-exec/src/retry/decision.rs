use std::time::Duration;

use crate::driver::DriverErrorKind;
use crate::error::JobError;
use crate::retry::config::RetryConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { delay: Duration, reason: RetryReason },
    Stop { reason: RetryReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    NotRetryable,
    AttemptsExhausted,
    Transient(DriverErrorKind),
}

/// Decide whether a failed job attempt is retried and how long to pause.
///
/// - `attempt_no`: 1-based number of the attempt that just failed.
/// - `rand_u64`: RNG for the uniform delay between `min_delay` and `max_delay`.
pub fn decide_retry(
    cfg: &RetryConfig,
    attempt_no: usize,
    error: &JobError,
    rand_u64: impl Fn() -> u64,
) -> RetryDecision {
    let kind = match error {
        JobError::Driver(e) if e.is_transient() => e.kind,
        _ => {
            return RetryDecision::Stop {
                reason: RetryReason::NotRetryable,
            }
        }
    };

    if let Some(max) = cfg.max_attempts {
        if attempt_no >= max {
            return RetryDecision::Stop {
                reason: RetryReason::AttemptsExhausted,
            };
        }
    }

    let min_ms = cfg.min_delay.as_millis() as u64;
    let max_ms = (cfg.max_delay.as_millis() as u64).max(min_ms);
    let span = max_ms - min_ms;
    let jitter_ms = if span == 0 { 0 } else { rand_u64() % (span + 1) };
    RetryDecision::RetryAfter {
        delay: Duration::from_millis(min_ms + jitter_ms),
        reason: RetryReason::Transient(kind),
    }
}
