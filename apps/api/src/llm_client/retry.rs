//! Retry policy for generation calls.
//!
//! Kept as a plain value so the schedule can be tested without any networking.

use std::time::Duration;

/// Default number of attempts (1 initial + 2 retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default linear backoff step: attempt 0 → 0s, 1 → 5s, 2 → 10s.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(5);

/// How long to wait before a given attempt.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `attempt_index × step`.
    Linear(Duration),
    /// The same delay before every retry; no delay before the first attempt.
    Fixed(Duration),
    /// Retry immediately.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::Linear(DEFAULT_BACKOFF_STEP),
        }
    }
}

impl RetryPolicy {
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Linear(step),
        }
    }

    /// Delay to sleep before attempt `attempt_index` (zero-based).
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        match self.backoff {
            Backoff::Linear(step) => step.saturating_mul(attempt_index),
            Backoff::Fixed(delay) if attempt_index > 0 => delay,
            Backoff::Fixed(_) | Backoff::None => Duration::ZERO,
        }
    }

    /// Sum of every delay the policy can enforce.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_attempts).map(|i| self.delay_for(i)).sum()
    }

    /// Only rate limiting (429) and unavailability (503) are worth another attempt.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 503)
    }
}
