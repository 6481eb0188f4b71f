//! Fixed-window rate limiting for outbound reports.
//!
//! The window resets lazily by wall-clock comparison on the next call, never
//! by a timer. Reset and slot consumption happen in one call, so callers
//! holding the tracker lock get both atomically.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Sliding-window counter capping accepted reports per window.
#[derive(Debug, Clone)]
pub struct ReportRateLimit {
    max_per_window: u32,
    window_ms: i64,
    count: u32,
    window_start: DateTime<Utc>,
}

impl ReportRateLimit {
    /// Create a limiter accepting `max_per_window` reports per `window`.
    pub fn new(max_per_window: u32, window: Duration, now: DateTime<Utc>) -> Self {
        Self {
            max_per_window,
            window_ms: window.as_millis().min(i64::MAX as u128) as i64,
            count: 0,
            window_start: now,
        }
    }

    /// Try to consume one slot at `now`.
    ///
    /// Returns `false` when the current window is exhausted - a hard drop,
    /// not a queue. The first call after the window elapses both resets the
    /// counter and consumes a slot.
    pub fn try_acquire(&mut self, now: DateTime<Utc>) -> bool {
        let elapsed = now.signed_duration_since(self.window_start).num_milliseconds();
        if elapsed >= self.window_ms || elapsed < 0 {
            self.count = 0;
            self.window_start = now;
        }

        if self.count >= self.max_per_window {
            return false;
        }
        self.count += 1;
        true
    }

    /// Reports accepted in the current window.
    #[must_use]
    pub fn accepted(&self) -> u32 {
        self.count
    }
}
