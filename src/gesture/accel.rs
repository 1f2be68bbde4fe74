//! Acceleration Profile
//!
//! Maps a speed (normalized units per microsecond) to a multiplicative
//! factor. Three linear pieces, in units per millisecond:
//!
//! | Speed | Factor |
//! |-------|--------|
//! | < 0.07 | `10 * speed + 0.3` |
//! | < threshold | `1` |
//! | otherwise | `incline * (speed - threshold) + 1` |
//!
//! The result is capped at `accel_cap`. Threshold and cap scale with the
//! device resolution, so higher-dpi devices get a proportionally lower cap.

use serde::Serialize;
use tracing::debug;

use crate::config::tuning::{
    ACCEL_CAP_ADJUST, DEFAULT_ACCEL_CAP, DEFAULT_INCLINE, DEFAULT_THRESHOLD_MS, INCLINE_ADJUST,
    MINIMUM_THRESHOLD_MS, REFERENCE_DPI, REST_RAMP_LIMIT_MS, REST_RAMP_OFFSET, REST_RAMP_SLOPE,
    THRESHOLD_ADJUST_MS,
};

fn per_ms(speed_us: f64) -> f64 {
    speed_us * 1000.0
}

fn per_us(speed_ms: f64) -> f64 {
    speed_ms / 1000.0
}

/// Linear acceleration profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccelerationProfile {
    /// Acceleration threshold, units per microsecond
    threshold: f64,
    /// Maximum factor at the reference resolution
    accel_cap: f64,
    /// Slope above the threshold
    incline: f64,
    dpi: u32,
    speed_adjustment: f64,
}

impl AccelerationProfile {
    /// Profile with default parameters for a device resolution
    pub fn new(dpi: u32) -> Self {
        Self {
            threshold: per_us(DEFAULT_THRESHOLD_MS),
            accel_cap: DEFAULT_ACCEL_CAP,
            incline: DEFAULT_INCLINE,
            dpi: dpi.max(1),
            speed_adjustment: 0.0,
        }
    }

    /// Profile with a speed adjustment applied
    pub fn with_speed(dpi: u32, speed_adjustment: f64) -> Self {
        let mut profile = Self::new(dpi);
        profile.set_speed(speed_adjustment);
        profile
    }

    /// Set the user speed adjustment, clamped to [-1, 1]
    ///
    /// Recomputes threshold, cap and incline from the defaults.
    pub fn set_speed(&mut self, speed_adjustment: f64) {
        let adj = if speed_adjustment.is_nan() {
            0.0
        } else {
            speed_adjustment.clamp(-1.0, 1.0)
        };

        let threshold_ms =
            (DEFAULT_THRESHOLD_MS - THRESHOLD_ADJUST_MS * adj).max(MINIMUM_THRESHOLD_MS);

        self.threshold = per_us(threshold_ms);
        self.accel_cap = DEFAULT_ACCEL_CAP + ACCEL_CAP_ADJUST * adj;
        self.incline = DEFAULT_INCLINE + INCLINE_ADJUST * adj;
        self.speed_adjustment = adj;

        debug!(
            "Acceleration profile: adj={:.2} threshold={:.3}/ms cap={:.2} incline={:.2}",
            adj, threshold_ms, self.accel_cap, self.incline
        );
    }

    /// Acceleration factor for a speed in units per microsecond
    pub fn factor(&self, speed: f64) -> f64 {
        let dpi_factor = f64::from(self.dpi) / REFERENCE_DPI;
        let cap = self.max_factor();
        let threshold = self.threshold * dpi_factor;
        let speed_ms = per_ms(speed);

        let factor = if speed_ms < REST_RAMP_LIMIT_MS {
            REST_RAMP_SLOPE * speed_ms + REST_RAMP_OFFSET
        } else if speed < threshold {
            1.0
        } else {
            self.incline * per_ms(speed - threshold) + 1.0
        };

        factor.min(cap)
    }

    /// Upper bound of [`factor`](Self::factor) for this device
    pub fn max_factor(&self) -> f64 {
        self.accel_cap / (f64::from(self.dpi) / REFERENCE_DPI)
    }

    /// Current speed adjustment
    pub fn speed_adjustment(&self) -> f64 {
        self.speed_adjustment
    }

    /// Acceleration threshold in units per millisecond
    pub fn threshold_ms(&self) -> f64 {
        per_ms(self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_ramp() {
        let profile = AccelerationProfile::new(1000);
        assert!((profile.factor(0.0) - 0.3).abs() < 1e-12);
        // 0.05 units/ms
        assert!((profile.factor(0.00005) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_unaccelerated_region() {
        let profile = AccelerationProfile::new(1000);
        // 0.1 and 0.39 units/ms sit between the ramp and the threshold
        assert_eq!(profile.factor(0.0001), 1.0);
        assert_eq!(profile.factor(0.00039), 1.0);
    }

    #[test]
    fn test_accelerated_region() {
        let profile = AccelerationProfile::new(1000);
        // 0.9 units/ms: 1.1 * 0.5 + 1
        assert!((profile.factor(0.0009) - 1.55).abs() < 1e-9);
    }

    #[test]
    fn test_cap() {
        let profile = AccelerationProfile::new(1000);
        assert_eq!(profile.factor(1.0), 2.0);

        // Twice the resolution halves the cap
        let high_dpi = AccelerationProfile::new(2000);
        assert_eq!(high_dpi.factor(1.0), 1.0);
        assert_eq!(high_dpi.max_factor(), 1.0);
    }

    #[test]
    fn test_speed_adjustment() {
        let mut profile = AccelerationProfile::new(1000);

        profile.set_speed(1.0);
        assert!((profile.threshold_ms() - 0.2).abs() < 1e-12);
        assert!((profile.max_factor() - 3.5).abs() < 1e-12);

        profile.set_speed(-1.0);
        assert!((profile.threshold_ms() - 0.65).abs() < 1e-12);
        assert!((profile.max_factor() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_speed_adjustment_clamped() {
        let profile = AccelerationProfile::with_speed(1000, 7.0);
        assert_eq!(profile.speed_adjustment(), 1.0);

        let profile = AccelerationProfile::with_speed(1000, f64::NAN);
        assert_eq!(profile.speed_adjustment(), 0.0);
    }

    #[test]
    fn test_threshold_floor() {
        // 0.4 - 0.25 * 1.0 = 0.15, floored to 0.2
        let profile = AccelerationProfile::with_speed(1000, 1.0);
        assert!(profile.threshold_ms() >= MINIMUM_THRESHOLD_MS - 1e-12);
    }

    #[test]
    fn test_monotonic_sweep() {
        for dpi in [400, 800, 1000, 1600, 3200] {
            for adj in [-1.0, -0.5, 0.0, 0.5, 1.0] {
                let profile = AccelerationProfile::with_speed(dpi, adj);
                let mut last = f64::MIN;
                for step in 0..2000 {
                    let speed = step as f64 * 1e-6;
                    let f = profile.factor(speed);
                    assert!(f >= last, "dpi={dpi} adj={adj} speed={speed}");
                    assert!(f <= profile.max_factor());
                    last = f;
                }
            }
        }
    }
}
