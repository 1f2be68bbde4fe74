//! Monotonic microsecond clock
//!
//! Events are stamped on receipt and ticks read the same clock, so every
//! timestamp the gesture core sees shares one epoch. Built on tokio's
//! `Instant` so tests with a paused runtime control it.

use tokio::time::Instant;

/// Microseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_us(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
