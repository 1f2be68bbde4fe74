//! Output sink abstraction
//!
//! The gesture core never touches a device. It returns [`Write`]s, and the
//! event loop hands them to an [`OutputSink`]: the uinput devices in
//! production, a [`RecordingSink`] in tests.

use crate::input::error::Result;
use crate::input::event::InputRecord;

/// Which virtual device a write targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputRole {
    /// Virtual mouse: buttons, motion, wheels
    Pointer,
    /// Virtual keyboard
    Keyboard,
}

/// One side-effect produced by the gesture core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    /// Write a record to a device
    Event(OutputRole, InputRecord),
    /// Close the current batch on a device
    Sync(OutputRole),
}

/// Destination for reemitted and synthesized events
pub trait OutputSink {
    /// Queue one record on a device
    fn write(&mut self, role: OutputRole, record: InputRecord) -> Result<()>;

    /// Close the batch queued on a device
    fn sync(&mut self, role: OutputRole) -> Result<()>;

    /// Apply writes in order
    fn apply(&mut self, writes: &[Write]) -> Result<()> {
        for write in writes {
            match *write {
                Write::Event(role, record) => self.write(role, record)?,
                Write::Sync(role) => self.sync(role)?,
            }
        }
        Ok(())
    }
}

/// In-memory sink that records everything written to it
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    writes: Vec<Write>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, in order
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Records written to one device, sync markers excluded
    pub fn records(&self, role: OutputRole) -> Vec<InputRecord> {
        self.writes
            .iter()
            .filter_map(|w| match *w {
                Write::Event(r, record) if r == role => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Number of sync markers sent to one device
    pub fn sync_count(&self, role: OutputRole) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, Write::Sync(r) if *r == role))
            .count()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl OutputSink for RecordingSink {
    fn write(&mut self, role: OutputRole, record: InputRecord) -> Result<()> {
        self.writes.push(Write::Event(role, record));
        Ok(())
    }

    fn sync(&mut self, role: OutputRole) -> Result<()> {
        self.writes.push(Write::Sync(role));
        Ok(())
    }
}
