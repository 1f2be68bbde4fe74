//! Scroll Integrator
//!
//! Runs once per tick, independent of input. Motion events only set a scroll
//! *rate* (through the per-axis scroll deltas); the integrator turns that rate
//! into whole high-resolution wheel units, so output is smooth whatever the
//! device's polling rate.
//!
//! Per axis and tick:
//!
//! ```text
//! target    = tick_curve(|delta|) * sign(delta)
//! rate      = min(1, since_warmup / 100ms) * SMOOTHING_RATE_CEILING
//! smoothed += (target - smoothed) * rate
//! fraction += smoothed * dt_ms
//! emit trunc(fraction), keep the remainder
//! ```

use crate::config::tuning::{
    HI_RES_UNITS_PER_NOTCH, SMOOTHING_RATE_CEILING, TICK_CURVE_CEILING, TICK_CURVE_SLOPE,
    WARMUP_US,
};
use crate::gesture::PerAxis;
use crate::input::Axis;

/// Saturating ramp applied to a scroll delta magnitude
///
/// Deliberately flatter than the motion acceleration profile.
pub fn tick_curve(magnitude: f64) -> f64 {
    if magnitude <= 0.0 {
        0.0
    } else {
        (magnitude * TICK_CURVE_SLOPE).min(TICK_CURVE_CEILING)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisState {
    /// Sub-unit remainder carried between ticks
    fraction: f64,
    /// Smoothed velocity, units per millisecond
    smoothed: f64,
    warmup_start_us: Option<u64>,
}

impl AxisState {
    fn blend_rate(&self, now_us: u64) -> f64 {
        let warmup = match self.warmup_start_us {
            Some(start) => (now_us.saturating_sub(start) as f64 / WARMUP_US as f64).min(1.0),
            None => 1.0,
        };
        warmup * SMOOTHING_RATE_CEILING
    }

    fn step(&mut self, now_us: u64, dt_ms: f64, delta: f64) -> i32 {
        let target = tick_curve(delta.abs()) * sign(delta);
        self.smoothed += (target - self.smoothed) * self.blend_rate(now_us);
        self.fraction += self.smoothed * dt_ms;

        if self.fraction.abs() >= 1.0 {
            let whole = self.fraction.trunc();
            self.fraction -= whole;
            whole as i32
        } else {
            0
        }
    }
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Fixed-interval integrator from scroll rate to scroll units
#[derive(Debug, Clone)]
pub struct ScrollIntegrator {
    axes: PerAxis<AxisState>,
    last_tick_us: u64,
}

impl ScrollIntegrator {
    pub fn new(now_us: u64) -> Self {
        Self {
            axes: PerAxis::default(),
            last_tick_us: now_us,
        }
    }

    /// Restart the warm-up ramp for an axis
    pub fn begin_warmup(&mut self, axis: Axis, now_us: u64) {
        self.axes[axis].warmup_start_us = Some(now_us);
    }

    /// Advance the clock without integrating
    pub fn skip(&mut self, now_us: u64) {
        self.last_tick_us = now_us.max(self.last_tick_us);
    }

    /// Integrate one tick and return the whole units to emit per axis
    ///
    /// `dt` is the real time since the previous tick, so a late tick
    /// integrates the full interval instead of a nominal one.
    pub fn tick(&mut self, now_us: u64, deltas: &PerAxis<f64>) -> PerAxis<i32> {
        let dt_ms = now_us.saturating_sub(self.last_tick_us) as f64 / 1000.0;
        self.last_tick_us = now_us.max(self.last_tick_us);

        PerAxis {
            horizontal: self.axes.horizontal.step(now_us, dt_ms, deltas.horizontal),
            vertical: self.axes.vertical.step(now_us, dt_ms, deltas.vertical),
        }
    }

    /// Drop remainders and smoothed velocity, keep the clock
    pub fn reset(&mut self) {
        self.axes = PerAxis::default();
    }

    /// Current sub-unit remainder for an axis
    pub fn fraction(&self, axis: Axis) -> f64 {
        self.axes[axis].fraction
    }

    /// Current smoothed velocity for an axis, units per millisecond
    pub fn smoothed_velocity(&self, axis: Axis) -> f64 {
        self.axes[axis].smoothed
    }
}

/// Derives legacy notch wheel events from high-resolution units
///
/// Real wheels report one `REL_WHEEL` for every 120 `REL_WHEEL_HI_RES`;
/// consumers that ignore the high-resolution axis still see scrolling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotchTracker {
    pending: PerAxis<i32>,
}

impl NotchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add high-resolution units and return whole notches completed
    pub fn push(&mut self, axis: Axis, units: i32) -> i32 {
        let pending = &mut self.pending[axis];
        *pending = pending.saturating_add(units);
        let notches = *pending / HI_RES_UNITS_PER_NOTCH;
        *pending -= notches * HI_RES_UNITS_PER_NOTCH;
        notches
    }

    pub fn reset(&mut self) {
        self.pending = PerAxis::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(delta: f64) -> PerAxis<f64> {
        PerAxis {
            horizontal: 0.0,
            vertical: delta,
        }
    }

    #[test]
    fn test_tick_curve() {
        assert_eq!(tick_curve(0.0), 0.0);
        assert_eq!(tick_curve(-3.0), 0.0);
        assert!((tick_curve(0.1) - 0.1).abs() < 1e-12);
        assert_eq!(tick_curve(50.0), TICK_CURVE_CEILING);
    }

    #[test]
    fn test_idle_emits_nothing() {
        let mut integrator = ScrollIntegrator::new(0);
        for i in 1..100 {
            let out = integrator.tick(i * 16_667, &PerAxis::default());
            assert_eq!(out, PerAxis::default());
        }
    }

    #[test]
    fn test_warmup_ramps_blend_rate() {
        let mut integrator = ScrollIntegrator::new(0);
        integrator.begin_warmup(Axis::Vertical, 0);

        // Zero elapsed warm-up: nothing moves
        integrator.tick(0, &vertical(10.0));
        assert_eq!(integrator.smoothed_velocity(Axis::Vertical), 0.0);

        // Half-way through warm-up: half the ceiling rate
        integrator.tick(50_000, &vertical(10.0));
        let expected = TICK_CURVE_CEILING * 0.5 * SMOOTHING_RATE_CEILING;
        assert!((integrator.smoothed_velocity(Axis::Vertical) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_emits_whole_units_and_keeps_remainder() {
        let mut integrator = ScrollIntegrator::new(0);
        integrator.begin_warmup(Axis::Vertical, 0);

        let mut total = 0;
        let mut now = 0;
        for _ in 0..60 {
            now += 16_667;
            let out = integrator.tick(now, &vertical(4.0));
            assert_eq!(out.horizontal, 0);
            assert!(out.vertical >= 0);
            total += out.vertical;
            assert!(integrator.fraction(Axis::Vertical).abs() < 1.0);
        }

        // Converged at 0.2 units/ms for most of one second
        assert!(total > 150, "total {total}");
        assert!(total <= 200, "total {total}");
    }

    #[test]
    fn test_negative_direction() {
        let mut integrator = ScrollIntegrator::new(0);
        integrator.begin_warmup(Axis::Horizontal, 0);

        let deltas = PerAxis {
            horizontal: -2.0,
            vertical: 0.0,
        };
        let mut total = 0;
        for i in 1..=30 {
            total += integrator.tick(i * 16_667, &deltas).horizontal;
        }
        assert!(total < 0);
    }

    #[test]
    fn test_late_tick_integrates_real_time() {
        let mut prompt = ScrollIntegrator::new(0);
        let mut late = ScrollIntegrator::new(0);
        prompt.begin_warmup(Axis::Vertical, 0);
        late.begin_warmup(Axis::Vertical, 0);

        // Warm both up to the same smoothed velocity
        for i in 1..=20 {
            prompt.tick(i * 10_000, &vertical(5.0));
            late.tick(i * 10_000, &vertical(5.0));
        }

        let short = prompt.tick(210_000, &vertical(5.0)).vertical;
        let long = late.tick(300_000, &vertical(5.0)).vertical;
        assert!(long > short);
    }

    #[test]
    fn test_reset_clears_axes() {
        let mut integrator = ScrollIntegrator::new(0);
        integrator.begin_warmup(Axis::Vertical, 0);
        for i in 1..10 {
            integrator.tick(i * 16_667, &vertical(1.0));
        }
        integrator.reset();
        assert_eq!(integrator.fraction(Axis::Vertical), 0.0);
        assert_eq!(integrator.smoothed_velocity(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_notch_tracker() {
        let mut notches = NotchTracker::new();
        assert_eq!(notches.push(Axis::Vertical, 100), 0);
        assert_eq!(notches.push(Axis::Vertical, 30), 1);
        assert_eq!(notches.push(Axis::Vertical, -20), 0);
        assert_eq!(notches.push(Axis::Vertical, -110), -1);
        assert_eq!(notches.push(Axis::Horizontal, 250), 2);
        notches.reset();
        assert_eq!(notches.push(Axis::Horizontal, 119), 0);
    }
}
