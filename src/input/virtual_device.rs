//! uinput output devices
//!
//! Two virtual devices with fixed capabilities: a pointer that carries every
//! reemitted hardware event plus synthesized wheel output, and a keyboard for
//! synthesized key taps. Writes are buffered per device and flushed as one
//! `emit` batch on sync; `emit` appends the SYN_REPORT itself.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};
use tracing::{debug, info, trace};

use crate::input::error::{DeviceError, Result};
use crate::input::event::{codes, InputRecord};
use crate::input::sink::{OutputRole, OutputSink};

/// Highest keyboard key code exposed on the virtual keyboard (KEY_MICMUTE)
const KEYBOARD_KEY_MAX: u16 = 248;

impl OutputRole {
    /// Label used in logs and errors
    pub fn label(self) -> &'static str {
        match self {
            OutputRole::Pointer => "pointer",
            OutputRole::Keyboard => "keyboard",
        }
    }
}

fn pointer_keys() -> AttributeSet<Key> {
    let mut keys = AttributeSet::new();
    for code in codes::BTN_LEFT..=codes::BTN_TASK {
        keys.insert(Key::new(code));
    }
    keys
}

fn pointer_axes() -> AttributeSet<RelativeAxisType> {
    let mut axes = AttributeSet::new();
    for code in [
        codes::REL_X,
        codes::REL_Y,
        codes::REL_HWHEEL,
        codes::REL_WHEEL,
        codes::REL_WHEEL_HI_RES,
        codes::REL_HWHEEL_HI_RES,
    ] {
        axes.insert(RelativeAxisType(code));
    }
    axes
}

fn keyboard_keys() -> AttributeSet<Key> {
    let mut keys = AttributeSet::new();
    for code in 1..=KEYBOARD_KEY_MAX {
        keys.insert(Key::new(code));
    }
    keys
}

fn build(role: OutputRole, name: &str) -> Result<VirtualDevice> {
    let error = |source| DeviceError::VirtualDevice {
        role: role.label(),
        source,
    };

    let builder = VirtualDeviceBuilder::new().map_err(error)?.name(name);
    let builder = match role {
        OutputRole::Pointer => builder
            .with_keys(&pointer_keys())
            .map_err(error)?
            .with_relative_axes(&pointer_axes())
            .map_err(error)?,
        OutputRole::Keyboard => builder.with_keys(&keyboard_keys()).map_err(error)?,
    };

    let device = builder.build().map_err(error)?;
    info!("Created virtual {} device \"{}\"", role.label(), name);
    Ok(device)
}

struct Output {
    role: OutputRole,
    device: VirtualDevice,
    batch: Vec<InputEvent>,
}

impl Output {
    fn new(role: OutputRole, name: &str) -> Result<Self> {
        Ok(Self {
            role,
            device: build(role, name)?,
            batch: Vec::with_capacity(16),
        })
    }

    fn flush(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }

        trace!("Flushing {} events to {}", self.batch.len(), self.role.label());
        self.device
            .emit(&self.batch)
            .map_err(|source| DeviceError::Write {
                role: self.role.label(),
                source,
            })?;
        self.batch.clear();
        Ok(())
    }
}

/// The virtual pointer and keyboard pair
pub struct VirtualDevices {
    pointer: Output,
    keyboard: Output,
}

impl VirtualDevices {
    /// Create both devices; names are `"<prefix> pointer"` and `"<prefix> keyboard"`
    pub fn create(name_prefix: &str) -> Result<Self> {
        let pointer = Output::new(OutputRole::Pointer, &format!("{name_prefix} pointer"))?;
        let keyboard = Output::new(OutputRole::Keyboard, &format!("{name_prefix} keyboard"))?;
        Ok(Self { pointer, keyboard })
    }

    fn output(&mut self, role: OutputRole) -> &mut Output {
        match role {
            OutputRole::Pointer => &mut self.pointer,
            OutputRole::Keyboard => &mut self.keyboard,
        }
    }
}

impl OutputSink for VirtualDevices {
    fn write(&mut self, role: OutputRole, record: InputRecord) -> Result<()> {
        let output = self.output(role);

        if record.event_type == codes::EV_SYN {
            // Reemitted hardware SYN_REPORT closes the batch; other SYN codes
            // (SYN_DROPPED) describe the source device and are not forwarded
            if record.is_sync() {
                return output.flush();
            }
            debug!("Not forwarding SYN code {}", record.code);
            return Ok(());
        }

        output.batch.push(InputEvent::new(
            EventType(record.event_type),
            record.code,
            record.value,
        ));
        Ok(())
    }

    fn sync(&mut self, role: OutputRole) -> Result<()> {
        self.output(role).flush()
    }
}

impl Drop for VirtualDevices {
    fn drop(&mut self) {
        // Best effort: a half-written batch would leave a button stuck
        let _ = self.pointer.flush();
        let _ = self.keyboard.flush();
    }
}
