//! Gesture State Machine
//!
//! The transition table as a pure function of `(state, event class)`. Side
//! effects are described by an [`Action`] that [`GestureContext`] carries out,
//! which keeps the table testable without any context or I/O.
//!
//! | State | Event | Action | Next | Decision |
//! |-------|-------|--------|------|----------|
//! | Idle | secondary-down | begin gesture | ScrollArmed | Drop |
//! | ScrollArmed | primary-down | tap space | ScrollArmed | Drop |
//! | ScrollArmed | motion | accumulate | Scrolling | Drop |
//! | ScrollArmed | secondary-up | replay secondary press | Idle | Reemit |
//! | Scrolling | motion | accumulate | Scrolling | Drop |
//! | Scrolling | secondary-up | end gesture | Idle | Drop |
//! | Scrolling | primary-down | - | Scrolling | Drop |
//! | any | primary-up | - | unchanged | Reemit |
//! | any | low-res wheel | - | unchanged | Drop |
//! | any | scan | - | unchanged | Drop |
//! | any | other | - | unchanged | Reemit |
//!
//! [`GestureContext`]: crate::gesture::GestureContext

use crate::input::{Axis, EventClass, Write};

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// Pointer behaves normally
    #[default]
    Idle,
    /// Secondary button held, no motion yet
    ScrollArmed,
    /// Motion seen while armed; motion is consumed as scrolling
    Scrolling,
    /// Reserved for step-wise scrolling; no transition enters it
    ScrollingDiscrete,
    /// Reserved for bound actions; no transition enters it
    ActionWaiting,
}

/// What happens to the hardware event itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Forward unmodified
    Reemit,
    /// Consume
    Drop,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Reset accumulators and the integrator, record the arm time
    BeginGesture,
    /// Press and release space on the virtual keyboard
    TapSpace,
    /// Feed motion into the trackers and the owning scroll delta
    Accumulate { axis: Axis, delta: i32 },
    /// Write the secondary press that was held back at arm time
    ReplaySecondaryPress,
    /// Clear scroll accumulators
    EndGesture,
}

/// Result of one transition step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: GestureState,
    pub decision: Decision,
    pub action: Action,
}

impl Step {
    fn new(next: GestureState, decision: Decision, action: Action) -> Self {
        Self {
            next,
            decision,
            action,
        }
    }

    fn stay(state: GestureState, decision: Decision) -> Self {
        Self::new(state, decision, Action::None)
    }
}

/// Transition table lookup
pub fn step(state: GestureState, class: EventClass) -> Step {
    use Decision::{Drop, Reemit};
    use GestureState::{Idle, ScrollArmed, Scrolling};

    match (state, class) {
        (Idle, EventClass::SecondaryDown) => Step::new(ScrollArmed, Drop, Action::BeginGesture),

        (ScrollArmed, EventClass::PrimaryDown) => Step::new(ScrollArmed, Drop, Action::TapSpace),
        (ScrollArmed, EventClass::Motion { axis, delta }) => {
            Step::new(Scrolling, Drop, Action::Accumulate { axis, delta })
        }
        (ScrollArmed, EventClass::SecondaryUp) => {
            Step::new(Idle, Reemit, Action::ReplaySecondaryPress)
        }

        (Scrolling, EventClass::Motion { axis, delta }) => {
            Step::new(Scrolling, Drop, Action::Accumulate { axis, delta })
        }
        (Scrolling, EventClass::SecondaryUp) => Step::new(Idle, Drop, Action::EndGesture),
        // Binding point for a chorded action
        (Scrolling, EventClass::PrimaryDown) => Step::stay(Scrolling, Drop),

        (state, EventClass::PrimaryUp) => Step::stay(state, Reemit),
        (state, EventClass::LowResWheel | EventClass::Scan) => Step::stay(state, Drop),
        (state, _) => Step::stay(state, Reemit),
    }
}

/// Outcome of dispatching one hardware event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: GestureState,
    pub decision: Decision,
    /// Synthesized writes, applied before a reemitted event
    pub writes: Vec<Write>,
}
