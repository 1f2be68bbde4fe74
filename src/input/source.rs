//! Physical input source
//!
//! Opens the configured evdev node, checks that it is a relative pointer,
//! grabs it exclusively and yields its events stamped with the shared
//! [`MonotonicClock`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use evdev::{Device, EventStream, RelativeAxisType};
use tracing::{debug, info};

use crate::input::clock::MonotonicClock;
use crate::input::error::{DeviceError, Result};
use crate::input::event::InputRecord;

/// Stream of hardware events
#[async_trait]
pub trait InputSource: Send {
    /// Wait for the next event; `None` when the source is exhausted
    ///
    /// Must be cancel-safe: the event loop races it against the ticker.
    async fn next_event(&mut self) -> Result<Option<InputRecord>>;
}

/// Grabbed evdev pointer device
pub struct EvdevSource {
    path: PathBuf,
    name: String,
    stream: EventStream,
    clock: MonotonicClock,
}

impl EvdevSource {
    /// Open and grab a pointer device
    ///
    /// Must be called from within a tokio runtime; the device fd is
    /// registered with the reactor.
    pub fn open(path: &Path, clock: MonotonicClock) -> Result<Self> {
        let mut device = Device::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let name = device.name().unwrap_or("unnamed device").to_string();
        debug!("Opened {:?}: {}", path, name);

        let has_motion = device.supported_relative_axes().is_some_and(|axes| {
            axes.contains(RelativeAxisType::REL_X) && axes.contains(RelativeAxisType::REL_Y)
        });
        if !has_motion {
            return Err(DeviceError::NotAPointer {
                path: path.to_path_buf(),
                name,
            });
        }

        device.grab().map_err(|source| DeviceError::Grab {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Grabbed input device {:?} ({})", path, name);

        let stream = device.into_event_stream().map_err(DeviceError::EventStream)?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            stream,
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name reported by the kernel
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl InputSource for EvdevSource {
    async fn next_event(&mut self) -> Result<Option<InputRecord>> {
        let event = self.stream.next_event().await.map_err(DeviceError::Read)?;

        Ok(Some(InputRecord::new(
            event.event_type().0,
            event.code(),
            event.value(),
            self.clock.now_us(),
        )))
    }
}

/// Source replaying a fixed list of records, for tests and benchmarks
///
/// Each record is delivered once the runtime clock reaches its timestamp
/// (relative to the clock's epoch), so scripted input interleaves with the
/// ticker the way hardware would.
pub struct ScriptedSource {
    records: std::collections::VecDeque<InputRecord>,
    clock: MonotonicClock,
}

impl ScriptedSource {
    pub fn new(records: impl IntoIterator<Item = InputRecord>, clock: MonotonicClock) -> Self {
        Self {
            records: records.into_iter().collect(),
            clock,
        }
    }

    /// Records not yet delivered
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl InputSource for ScriptedSource {
    async fn next_event(&mut self) -> Result<Option<InputRecord>> {
        let Some(due) = self.records.front().map(|r| r.timestamp_us) else {
            return Ok(None);
        };

        let now = self.clock.now_us();
        if due > now {
            tokio::time::sleep(std::time::Duration::from_micros(due - now)).await;
        }

        // Popped only after the wait so a cancelled call loses nothing
        Ok(self.records.pop_front())
    }
}
