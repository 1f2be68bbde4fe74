//! Motion Accumulator
//!
//! Decides which axis owns the current gesture. Each axis keeps a signed
//! magnitude clamped to `±MOTION_ACCUMULATOR_LIMIT`. Motion on one axis adds
//! to it and pulls the other axis toward zero by the same amount, so a
//! sustained diagonal drift cannot hand ownership back and forth.

use crate::config::tuning::MOTION_ACCUMULATOR_LIMIT;
use crate::input::Axis;

/// Per-axis decaying motion magnitude
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionAccumulator {
    horizontal: i32,
    vertical: i32,
}

impl MotionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one motion sample and return the axis that now owns the gesture
    pub fn update(&mut self, axis: Axis, delta: i32) -> Axis {
        let limit = MOTION_ACCUMULATOR_LIMIT;
        let decay = delta.saturating_abs();

        let (own, other) = match axis {
            Axis::Horizontal => (&mut self.horizontal, &mut self.vertical),
            Axis::Vertical => (&mut self.vertical, &mut self.horizontal),
        };

        *own = own.saturating_add(delta).clamp(-limit, limit);
        *other = decay_toward_zero(*other, decay);

        self.dominant()
    }

    /// Vertical wins ties
    pub fn dominant(&self) -> Axis {
        if self.vertical.abs() >= self.horizontal.abs() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    /// Stored magnitude for an axis
    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn decay_toward_zero(value: i32, amount: i32) -> i32 {
    if value > 0 {
        value.saturating_sub(amount).max(0)
    } else {
        value.saturating_add(amount).min(0)
    }
}
