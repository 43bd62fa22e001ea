//! Exponential backoff schedules for job submission and polling

use std::time::Duration;

/// Attempts at starting an export job while the account is at its job limit
pub const START_MAX_ATTEMPTS: u32 = 10;

/// Base delay between start attempts
pub const START_BASE_DELAY: Duration = Duration::from_secs(5);

/// Status polls per job before giving up
pub const POLL_MAX_ATTEMPTS: u32 = 7;

/// Base delay between status polls
pub const POLL_BASE_DELAY: Duration = Duration::from_secs(4);

/// Fixed-ceiling exponential backoff without jitter
///
/// The delay after attempt `k` (0-based) is `base_delay * 2^k`.
///
/// # Examples
///
/// ```
/// use qsvault::core::backup::BackoffPolicy;
/// use std::time::Duration;
///
/// let policy = BackoffPolicy::submission();
/// assert_eq!(policy.delay_for(0), Duration::from_secs(5));
/// assert_eq!(policy.delay_for(3), Duration::from_secs(40));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl BackoffPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Schedule for starting export jobs
    pub const fn submission() -> Self {
        Self::new(START_MAX_ATTEMPTS, START_BASE_DELAY)
    }

    /// Schedule for polling export jobs
    pub const fn polling() -> Self {
        Self::new(POLL_MAX_ATTEMPTS, POLL_BASE_DELAY)
    }

    /// Delay after the given 0-based attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}
