//! Hardware event records
//!
//! The record shape shared by the input source, the gesture core and the
//! output sink, plus the classification of a record against the configured
//! button binding.

use serde::Serialize;

/// Linux input event codes used by the daemon
#[allow(missing_docs)]
pub mod codes {
    pub const EV_SYN: u16 = 0x00;
    pub const EV_KEY: u16 = 0x01;
    pub const EV_REL: u16 = 0x02;
    pub const EV_MSC: u16 = 0x04;

    pub const SYN_REPORT: u16 = 0x00;

    pub const REL_X: u16 = 0x00;
    pub const REL_Y: u16 = 0x01;
    pub const REL_HWHEEL: u16 = 0x06;
    pub const REL_WHEEL: u16 = 0x08;
    pub const REL_WHEEL_HI_RES: u16 = 0x0b;
    pub const REL_HWHEEL_HI_RES: u16 = 0x0c;

    pub const MSC_SCAN: u16 = 0x04;

    pub const BTN_LEFT: u16 = 0x110;
    pub const BTN_RIGHT: u16 = 0x111;
    pub const BTN_MIDDLE: u16 = 0x112;
    pub const BTN_SIDE: u16 = 0x113;
    pub const BTN_EXTRA: u16 = 0x114;
    pub const BTN_FORWARD: u16 = 0x115;
    pub const BTN_BACK: u16 = 0x116;
    pub const BTN_TASK: u16 = 0x117;

    pub const KEY_SPACE: u16 = 57;
}

/// One input event record
///
/// `timestamp_us` is microseconds on the daemon's monotonic clock. It is
/// never written to the output; the kernel stamps synthesized events itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRecord {
    /// Event type (`EV_KEY`, `EV_REL`, ...)
    pub event_type: u16,
    /// Button, key or axis code
    pub code: u16,
    /// Event value
    pub value: i32,
    /// Receipt time in microseconds
    pub timestamp_us: u64,
}

impl InputRecord {
    /// Build a record from its raw parts
    pub fn new(event_type: u16, code: u16, value: i32, timestamp_us: u64) -> Self {
        Self {
            event_type,
            code,
            value,
            timestamp_us,
        }
    }

    /// Key or button transition
    pub fn key(code: u16, pressed: bool, timestamp_us: u64) -> Self {
        Self::new(codes::EV_KEY, code, i32::from(pressed), timestamp_us)
    }

    /// Relative axis movement
    pub fn rel(code: u16, value: i32, timestamp_us: u64) -> Self {
        Self::new(codes::EV_REL, code, value, timestamp_us)
    }

    /// `SYN_REPORT` marker
    pub fn syn_report(timestamp_us: u64) -> Self {
        Self::new(codes::EV_SYN, codes::SYN_REPORT, 0, timestamp_us)
    }

    /// Whether this record closes a batch
    pub fn is_sync(&self) -> bool {
        self.event_type == codes::EV_SYN && self.code == codes::SYN_REPORT
    }
}

/// Motion axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The orthogonal axis
    pub fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// High-resolution wheel code that scrolls along this axis
    pub fn hi_res_code(self) -> u16 {
        match self {
            Axis::Horizontal => codes::REL_HWHEEL_HI_RES,
            Axis::Vertical => codes::REL_WHEEL_HI_RES,
        }
    }

    /// Legacy notch wheel code that scrolls along this axis
    pub fn notch_code(self) -> u16 {
        match self {
            Axis::Horizontal => codes::REL_HWHEEL,
            Axis::Vertical => codes::REL_WHEEL,
        }
    }
}

/// Mouse buttons that can be bound to the primary or secondary role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Side,
    Extra,
}

impl MouseButton {
    /// Linux button code
    pub fn code(self) -> u16 {
        match self {
            MouseButton::Left => codes::BTN_LEFT,
            MouseButton::Right => codes::BTN_RIGHT,
            MouseButton::Middle => codes::BTN_MIDDLE,
            MouseButton::Side => codes::BTN_SIDE,
            MouseButton::Extra => codes::BTN_EXTRA,
        }
    }
}

/// Which buttons play the primary and secondary roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    pub primary: u16,
    pub secondary: u16,
}

impl ButtonBinding {
    pub fn new(primary: MouseButton, secondary: MouseButton) -> Self {
        Self {
            primary: primary.code(),
            secondary: secondary.code(),
        }
    }
}

impl Default for ButtonBinding {
    fn default() -> Self {
        Self::new(MouseButton::Left, MouseButton::Right)
    }
}

/// What a record means to the gesture state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    PrimaryDown,
    PrimaryUp,
    SecondaryDown,
    SecondaryUp,
    Motion { axis: Axis, delta: i32 },
    /// Notch-resolution wheel; the high-resolution channel carries scrolling
    LowResWheel,
    Scan,
    Other,
}

impl EventClass {
    pub fn classify(record: &InputRecord, binding: &ButtonBinding) -> Self {
        match (record.event_type, record.code) {
            (codes::EV_KEY, code) if code == binding.primary => {
                if record.value != 0 {
                    EventClass::PrimaryDown
                } else {
                    EventClass::PrimaryUp
                }
            }
            (codes::EV_KEY, code) if code == binding.secondary => {
                if record.value != 0 {
                    EventClass::SecondaryDown
                } else {
                    EventClass::SecondaryUp
                }
            }
            (codes::EV_REL, codes::REL_X) => EventClass::Motion {
                axis: Axis::Horizontal,
                delta: record.value,
            },
            (codes::EV_REL, codes::REL_Y) => EventClass::Motion {
                axis: Axis::Vertical,
                delta: record.value,
            },
            (codes::EV_REL, codes::REL_WHEEL | codes::REL_HWHEEL) => EventClass::LowResWheel,
            (codes::EV_MSC, codes::MSC_SCAN) => EventClass::Scan,
            _ => EventClass::Other,
        }
    }
}
