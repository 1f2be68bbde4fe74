//! Tuning constants
//!
//! Physical-unit constants for the gesture pipeline. These are the main
//! tuning surface of the daemon, so they live in one place instead of being
//! folded into the formulas that use them.

/// Resolution all motion deltas are normalized to (dots per inch)
pub const REFERENCE_DPI: f64 = 1000.0;

/// Default device resolution assumed when none is configured
pub const DEFAULT_DPI: u32 = 1000;

/// Number of samples kept by the velocity tracker
pub const VELOCITY_SAMPLES: usize = 16;

/// Bound on each axis of the motion accumulator
pub const MOTION_ACCUMULATOR_LIMIT: i32 = 10;

// Acceleration profile, speeds in units per millisecond

/// Speed below which the near-rest ramp applies
pub const REST_RAMP_LIMIT_MS: f64 = 0.07;
/// Slope of the near-rest ramp
pub const REST_RAMP_SLOPE: f64 = 10.0;
/// Factor at zero speed
pub const REST_RAMP_OFFSET: f64 = 0.3;

/// Default threshold where acceleration starts
pub const DEFAULT_THRESHOLD_MS: f64 = 0.4;
/// Threshold never drops below this, whatever the speed adjustment
pub const MINIMUM_THRESHOLD_MS: f64 = 0.2;
/// Default acceleration cap
pub const DEFAULT_ACCEL_CAP: f64 = 2.0;
/// Default incline above the threshold
pub const DEFAULT_INCLINE: f64 = 1.1;

/// Threshold shift per unit of speed adjustment
pub const THRESHOLD_ADJUST_MS: f64 = 0.25;
/// Cap shift per unit of speed adjustment
pub const ACCEL_CAP_ADJUST: f64 = 1.5;
/// Incline shift per unit of speed adjustment
pub const INCLINE_ADJUST: f64 = 0.75;

/// Gain applied to accelerated motion before it enters a scroll accumulator
pub const SCROLL_GAIN: f64 = 1.0;

// Scroll integrator

/// Ceiling of the tick curve, in high-resolution scroll units per millisecond
pub const TICK_CURVE_CEILING: f64 = 0.2;
/// Slope of the tick curve below its ceiling
pub const TICK_CURVE_SLOPE: f64 = 1.0;
/// Upper bound of the per-tick velocity blend rate
pub const SMOOTHING_RATE_CEILING: f64 = 0.5;
/// Duration of the warm-up ramp after an axis starts scrolling
pub const WARMUP_US: u64 = 100_000;

/// High-resolution units per legacy wheel notch
pub const HI_RES_UNITS_PER_NOTCH: i32 = 120;

/// Default tick interval (~60 Hz)
pub const DEFAULT_TICK_INTERVAL_US: u64 = 16_667;
