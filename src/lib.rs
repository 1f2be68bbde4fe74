//! # mouse-autoscroll
//!
//! Hold-to-scroll for Linux pointers: while the secondary button is held,
//! pointer motion becomes smooth high-resolution wheel scrolling.
//!
//! The daemon grabs one evdev pointer exclusively and re-emits its events
//! through uinput, consuming and synthesizing events as the gesture requires.
//!
//! # Architecture
//!
//! ```text
//! mouse-autoscroll
//!   ├─> Input Source (grabbed evdev pointer)
//!   ├─> Gesture Core (state machine, velocity, acceleration, integrator)
//!   ├─> Virtual Devices (uinput pointer + keyboard)
//!   └─> Event Loop (input and ticker multiplexed on one task)
//! ```
//!
//! # Data Flow
//!
//! **Event Path:** Device → EvdevSource → GestureContext::dispatch → Reemit/Drop → Virtual Pointer
//!
//! **Scroll Path:** Ticker → GestureContext::tick → ScrollIntegrator → REL_WHEEL_HI_RES → Virtual Pointer
//!
//! **Tap Path:** Primary click while armed → space press/release → Virtual Keyboard

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Daemon configuration and tuning constants
pub mod config;

/// Daemon orchestration and the event loop
pub mod daemon;

/// Gesture interpretation
///
/// The pure core of the daemon: nothing in here performs I/O, so every
/// behavior is testable with scripted records and explicit timestamps.
pub mod gesture;

/// Device layer: evdev input, uinput output, the shared clock
pub mod input;

/// Utility functions
pub mod utils;
