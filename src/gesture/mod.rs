//! Gesture interpretation
//!
//! Turns the grabbed device's event stream into the output stream: while the
//! secondary button is held, motion becomes scrolling along whichever axis
//! dominates; everything else passes through.
//!
//! # Architecture
//!
//! ```text
//! hardware event ──> GestureContext::dispatch ──> Transition { decision, writes }
//!                      │  state::step (pure table)
//!                      ├─ MotionAccumulator   (axis ownership)
//!                      ├─ VelocityTracker     (windowed speed)
//!                      └─ AccelerationProfile (speed -> factor)
//!
//! tick ──> GestureContext::tick ──> ScrollIntegrator ──> wheel writes
//! ```
//!
//! Both entry points take `&mut GestureContext`; the event loop owns the only
//! instance and never runs them concurrently.

pub mod accel;
pub mod integrator;
pub mod motion;
pub mod state;
pub mod velocity;

use std::ops::{Index, IndexMut};

use tracing::{debug, trace};

pub use accel::AccelerationProfile;
pub use integrator::{tick_curve, NotchTracker, ScrollIntegrator};
pub use motion::MotionAccumulator;
pub use state::{step, Action, Decision, GestureState, Step, Transition};
pub use velocity::VelocityTracker;

use crate::config::tuning::{DEFAULT_DPI, SCROLL_GAIN};
use crate::input::{codes, Axis, ButtonBinding, EventClass, InputRecord, OutputRole, Write};

/// A value per scroll axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerAxis<T> {
    #[allow(missing_docs)]
    pub horizontal: T,
    #[allow(missing_docs)]
    pub vertical: T,
}

impl<T> Index<Axis> for PerAxis<T> {
    type Output = T;

    fn index(&self, axis: Axis) -> &T {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }
}

impl<T> IndexMut<Axis> for PerAxis<T> {
    fn index_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }
}

/// Settings the gesture core needs from the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    /// Which physical buttons act as primary and secondary
    pub binding: ButtonBinding,
    /// Device resolution
    pub dpi: u32,
    /// User speed adjustment, [-1, 1]
    pub speed_adjustment: f64,
    /// Scroll content with the pointer instead of against it
    pub natural_scrolling: bool,
    /// Also emit notch wheel events every 120 high-resolution units
    pub legacy_wheel: bool,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            binding: ButtonBinding::default(),
            dpi: DEFAULT_DPI,
            speed_adjustment: 0.0,
            natural_scrolling: false,
            legacy_wheel: true,
        }
    }
}

/// The single mutable gesture aggregate
#[derive(Debug, Clone)]
pub struct GestureContext {
    settings: GestureSettings,
    state: GestureState,
    motion: MotionAccumulator,
    velocity: VelocityTracker,
    profile: AccelerationProfile,
    /// Accumulated scroll amount per axis; sets the integrator's target rate
    scroll: PerAxis<f64>,
    integrator: ScrollIntegrator,
    notches: NotchTracker,
    primary_pressed: bool,
    secondary_pressed: bool,
    armed_at_us: Option<u64>,
    gesture_started_us: Option<u64>,
    last_motion_us: Option<u64>,
}

impl GestureContext {
    /// Fresh context in `Idle`, integrator clock starting at `now_us`
    pub fn new(settings: GestureSettings, now_us: u64) -> Self {
        Self {
            state: GestureState::Idle,
            motion: MotionAccumulator::new(),
            velocity: VelocityTracker::new(settings.dpi),
            profile: AccelerationProfile::with_speed(settings.dpi, settings.speed_adjustment),
            scroll: PerAxis::default(),
            integrator: ScrollIntegrator::new(now_us),
            notches: NotchTracker::new(),
            primary_pressed: false,
            secondary_pressed: false,
            armed_at_us: None,
            gesture_started_us: None,
            last_motion_us: None,
            settings,
        }
    }

    /// Interpret one hardware event
    pub fn dispatch(&mut self, record: &InputRecord) -> Transition {
        let class = EventClass::classify(record, &self.settings.binding);
        self.track_buttons(class);

        let step = state::step(self.state, class);
        let now = record.timestamp_us;
        let mut writes = Vec::new();

        match step.action {
            Action::None => {}
            Action::BeginGesture => self.begin_gesture(now),
            Action::TapSpace => {
                debug!("Primary click while armed, tapping space");
                for pressed in [true, false] {
                    writes.push(Write::Event(
                        OutputRole::Keyboard,
                        InputRecord::key(codes::KEY_SPACE, pressed, now),
                    ));
                    writes.push(Write::Sync(OutputRole::Keyboard));
                }
            }
            Action::Accumulate { axis, delta } => {
                if self.state == GestureState::ScrollArmed {
                    self.gesture_started_us = Some(now);
                }
                self.accumulate(axis, delta, now);
            }
            Action::ReplaySecondaryPress => {
                writes.push(Write::Event(
                    OutputRole::Pointer,
                    InputRecord::key(self.settings.binding.secondary, true, now),
                ));
                writes.push(Write::Sync(OutputRole::Pointer));
            }
            Action::EndGesture => self.end_gesture(),
        }

        if step.next != self.state {
            debug!("Gesture {:?} -> {:?}", self.state, step.next);
        }
        self.state = step.next;

        Transition {
            next: step.next,
            decision: step.decision,
            writes,
        }
    }

    /// Run the scroll integrator for one tick
    pub fn tick(&mut self, now_us: u64) -> Vec<Write> {
        if self.state != GestureState::Scrolling {
            self.integrator.skip(now_us);
            return Vec::new();
        }

        let units = self.integrator.tick(now_us, &self.scroll);
        let mut writes = Vec::new();

        for axis in [Axis::Vertical, Axis::Horizontal] {
            let amount = units[axis];
            if amount == 0 {
                continue;
            }

            let value = self.output_direction(axis) * amount;
            trace!("Scroll {:?}: {} units", axis, value);
            writes.push(Write::Event(
                OutputRole::Pointer,
                InputRecord::rel(axis.hi_res_code(), value, now_us),
            ));

            if self.settings.legacy_wheel {
                let notches = self.notches.push(axis, value);
                if notches != 0 {
                    writes.push(Write::Event(
                        OutputRole::Pointer,
                        InputRecord::rel(axis.notch_code(), notches, now_us),
                    ));
                }
            }
        }

        if !writes.is_empty() {
            writes.push(Write::Sync(OutputRole::Pointer));
        }
        writes
    }

    fn track_buttons(&mut self, class: EventClass) {
        match class {
            EventClass::PrimaryDown => self.primary_pressed = true,
            EventClass::PrimaryUp => self.primary_pressed = false,
            EventClass::SecondaryDown => self.secondary_pressed = true,
            EventClass::SecondaryUp => self.secondary_pressed = false,
            _ => {}
        }
    }

    fn begin_gesture(&mut self, now: u64) {
        self.motion.reset();
        self.scroll = PerAxis::default();
        self.integrator.reset();
        self.notches.reset();
        self.armed_at_us = Some(now);
        self.gesture_started_us = None;
    }

    fn end_gesture(&mut self) {
        if let (Some(start), Some(last)) = (self.gesture_started_us, self.last_motion_us) {
            debug!("Gesture ended after {} ms of motion", last.saturating_sub(start) / 1000);
        }
        self.scroll = PerAxis::default();
        self.integrator.reset();
        self.notches.reset();
        self.armed_at_us = None;
        self.gesture_started_us = None;
    }

    fn accumulate(&mut self, axis: Axis, delta: i32, now: u64) {
        self.last_motion_us = Some(now);

        let owner = self.motion.update(axis, delta);
        let (dx, dy) = match axis {
            Axis::Horizontal => (delta, 0),
            Axis::Vertical => (0, delta),
        };
        self.velocity.feed(dx, dy, now);

        // Single-axis scrolling only
        self.scroll[owner.other()] = 0.0;

        if owner != axis || delta == 0 {
            return;
        }

        let speed = self.velocity.velocity(now);
        let factor = self.profile.factor(speed);

        let current = self.scroll[axis];
        let reversed = current != 0.0 && (current > 0.0) != (delta > 0);
        if reversed {
            trace!("Direction reversal on {:?}, dropping momentum", axis);
        }
        if current == 0.0 || reversed {
            self.scroll[axis] = 0.0;
            self.integrator.begin_warmup(axis, now);
        }

        self.scroll[axis] += f64::from(delta) * factor * SCROLL_GAIN;
        trace!(
            "Motion {:?} {} speed={:.5} factor={:.3} scroll={:.2}",
            axis,
            delta,
            speed,
            factor,
            self.scroll[axis]
        );
    }

    fn output_direction(&self, axis: Axis) -> i32 {
        // Positive REL_WHEEL scrolls up, so downward motion maps to negative
        let base = match axis {
            Axis::Vertical => -1,
            Axis::Horizontal => 1,
        };
        if self.settings.natural_scrolling {
            -base
        } else {
            base
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Accumulated scroll amount for an axis
    pub fn scroll_delta(&self, axis: Axis) -> f64 {
        self.scroll[axis]
    }

    pub fn motion(&self) -> &MotionAccumulator {
        &self.motion
    }

    pub fn integrator(&self) -> &ScrollIntegrator {
        &self.integrator
    }

    pub fn profile(&self) -> &AccelerationProfile {
        &self.profile
    }

    pub fn primary_pressed(&self) -> bool {
        self.primary_pressed
    }

    pub fn secondary_pressed(&self) -> bool {
        self.secondary_pressed
    }

    /// When the current gesture was armed
    pub fn armed_at(&self) -> Option<u64> {
        self.armed_at_us
    }

    /// When the current gesture saw its first motion
    pub fn gesture_started_at(&self) -> Option<u64> {
        self.gesture_started_us
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }
}
