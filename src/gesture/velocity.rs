//! Velocity Tracker
//!
//! Fixed ring of recent motion samples. Speed is the windowed average over
//! whatever the ring currently holds:
//!
//! ```text
//! velocity = |Σ delta| / max(1, newest_time - oldest_time)
//! ```
//!
//! Deltas are normalized to 1000 dpi on entry, so the result is in
//! normalized units per microsecond. Entries that were never overwritten keep
//! their initial timestamp and widen the span, which suppresses velocity until
//! the ring has cycled once.

use crate::config::tuning::{REFERENCE_DPI, VELOCITY_SAMPLES};

#[derive(Debug, Clone, Copy, Default)]
struct MotionSample {
    dx: f64,
    dy: f64,
    time_us: u64,
}

/// Ring buffer velocity tracker
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: [MotionSample; VELOCITY_SAMPLES],
    next: usize,
    dpi: u32,
}

impl VelocityTracker {
    /// Create a tracker for a device with the given resolution
    pub fn new(dpi: u32) -> Self {
        Self {
            samples: [MotionSample::default(); VELOCITY_SAMPLES],
            next: 0,
            dpi: dpi.max(1),
        }
    }

    /// Record a raw device delta
    pub fn feed(&mut self, dx: i32, dy: i32, time_us: u64) {
        let scale = REFERENCE_DPI / f64::from(self.dpi);
        self.samples[self.next] = MotionSample {
            dx: f64::from(dx) * scale,
            dy: f64::from(dy) * scale,
            time_us,
        };
        self.next = (self.next + 1) % VELOCITY_SAMPLES;
    }

    /// Windowed speed in normalized units per microsecond
    ///
    /// `_now_us` is accepted for symmetry with `feed`; the window is defined
    /// by the stored samples alone.
    pub fn velocity(&self, _now_us: u64) -> f64 {
        let (mut dx, mut dy) = (0.0, 0.0);
        let mut oldest = u64::MAX;
        let mut newest = 0u64;

        for sample in &self.samples {
            dx += sample.dx;
            dy += sample.dy;
            oldest = oldest.min(sample.time_us);
            newest = newest.max(sample.time_us);
        }

        let span = if newest > oldest { newest - oldest } else { 1 };
        dx.hypot(dy) / span as f64
    }

    /// Overwrite every slot with a zero delta at `time_us`
    pub fn reset(&mut self, time_us: u64) {
        self.samples = [MotionSample {
            time_us,
            ..MotionSample::default()
        }; VELOCITY_SAMPLES];
        self.next = 0;
    }

    /// Device resolution used for normalization
    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}
