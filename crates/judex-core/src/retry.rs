//! Bounded exponential backoff.

use std::time::Duration;

use crate::models::config::{secs, RetrySettings};

/// Attempt ceiling and delay schedule shared by page loads and document downloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    settings: RetrySettings,
}

impl RetryPolicy {
    pub fn new(settings: RetrySettings) -> Self {
        Self { settings }
    }

    /// Total attempts, never less than one.
    pub fn max_attempts(&self) -> u32 {
        self.settings.max_attempts.max(1)
    }

    /// Wait before the attempt following attempt `attempt` (1-based):
    /// `multiplier * 2^(attempt-1)` seconds, clamped to `[min, max]`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(30) as i32;
        let raw = self.settings.multiplier * 2f64.powi(exponent);
        secs(raw.max(self.settings.min_secs).min(self.settings.max_secs))
    }
}
