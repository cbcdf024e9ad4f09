//! Bounded retry with a configurable backoff schedule.

use std::time::Duration;

/// Wait schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// No waiting between attempts.
    None,
    /// The same delay after every failed attempt.
    Fixed(Duration),
    /// `step * attempt` after failed attempt N (1-based), so the waits
    /// grow 1x, 2x, 3x.
    Linear(Duration),
}

impl Backoff {
    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(step) => *step,
            Backoff::Linear(step) => *step * attempt,
        }
    }
}

/// Attempt budget plus backoff schedule for remote reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Delay to sleep after failed attempt `attempt` (1-based), or
    /// `None` when the budget is spent and no further attempt follows.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt < self.max_attempts {
            Some(self.backoff.delay(attempt))
        } else {
            None
        }
    }
}

/// Three attempts, with failed attempt N followed by an N second wait.
impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Linear(Duration::from_secs(1)),
        }
    }
}
