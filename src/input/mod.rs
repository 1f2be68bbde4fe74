//! Device Layer
//!
//! Everything that touches `/dev/input` and `/dev/uinput`. The gesture core
//! only sees [`InputRecord`]s and returns [`Write`]s; this module supplies
//! the records and carries out the writes.
//!
//! # Architecture
//!
//! ```text
//! /dev/input/eventN (grabbed)
//!       ↓
//! ┌─────────────────────────┐
//! │  EvdevSource            │ ← stamps records with MonotonicClock
//! └─────────────────────────┘
//!       ↓ InputRecord
//!   gesture core
//!       ↓ Write
//! ┌─────────────────────────┐
//! │  VirtualDevices         │ ← per-device batches, flushed on sync
//! └─────────────────────────┘
//!       ↓           ↓
//!   pointer      keyboard
//!   (uinput)     (uinput)
//! ```
//!
//! Tests replace both ends with [`ScriptedSource`] and [`RecordingSink`].
//!
//! # Error Handling
//!
//! Every device failure is a [`DeviceError`]. None of them are recoverable
//! in-process; [`classify_error`] picks the hint shown to the user.

pub mod clock;
pub mod error;
pub mod event;
pub mod sink;
pub mod source;
pub mod virtual_device;

pub use clock::MonotonicClock;
pub use error::{classify_error, DeviceError, ErrorType, Result};
pub use event::{codes, Axis, ButtonBinding, EventClass, InputRecord, MouseButton};
pub use sink::{OutputRole, OutputSink, RecordingSink, Write};
pub use source::{EvdevSource, InputSource, ScriptedSource};
pub use virtual_device::VirtualDevices;
