//! Device Error Types
//!
//! Errors from the physical and virtual device layer. All of them are fatal:
//! at startup they mean a misconfiguration, at runtime they mean a device
//! went away.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for device operations
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Device layer error types
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Input device node could not be opened
    #[error("Failed to open input device {path:?}: {source}")]
    Open {
        /// Device node
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Device does not report relative X/Y motion
    #[error("Input device {path:?} ({name}) does not report relative motion")]
    NotAPointer {
        /// Device node
        path: PathBuf,
        /// Name reported by the kernel
        name: String,
    },

    /// Exclusive grab refused (usually another grabber)
    #[error("Failed to grab input device {path:?}: {source}")]
    Grab {
        /// Device node
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Async event stream setup failed
    #[error("Failed to register input device with the event loop: {0}")]
    EventStream(#[source] io::Error),

    /// uinput device creation failed
    #[error("Failed to create virtual {role} device: {source}")]
    VirtualDevice {
        /// "pointer" or "keyboard"
        role: &'static str,
        #[source]
        source: io::Error,
    },

    /// Reading from the grabbed device failed
    #[error("Failed to read from input device: {0}")]
    Read(#[source] io::Error),

    /// Writing to a virtual device failed
    #[error("Failed to write to virtual {role} device: {source}")]
    Write {
        /// "pointer" or "keyboard"
        role: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Error classification for user-facing hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Permission problem on /dev/input or /dev/uinput
    Access,
    /// Missing device node
    Missing,
    /// Device exists but is the wrong kind, or is already grabbed
    Device,
    /// Device disappeared or I/O failed at runtime
    Runtime,
}

impl DeviceError {
    /// Underlying I/O error, if any
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            DeviceError::Open { source, .. }
            | DeviceError::Grab { source, .. }
            | DeviceError::VirtualDevice { source, .. }
            | DeviceError::Write { source, .. } => Some(source),
            DeviceError::EventStream(source) | DeviceError::Read(source) => Some(source),
            DeviceError::NotAPointer { .. } => None,
        }
    }
}

/// Classify error for hint selection
pub fn classify_error(error: &DeviceError) -> ErrorType {
    let kind = error.io_error().map(io::Error::kind);

    match (error, kind) {
        (_, Some(io::ErrorKind::PermissionDenied)) => ErrorType::Access,
        (DeviceError::Open { .. }, Some(io::ErrorKind::NotFound)) => ErrorType::Missing,
        (DeviceError::VirtualDevice { .. }, Some(io::ErrorKind::NotFound)) => ErrorType::Missing,
        (DeviceError::NotAPointer { .. } | DeviceError::Grab { .. }, _) => ErrorType::Device,
        (DeviceError::Open { .. } | DeviceError::VirtualDevice { .. }, _) => ErrorType::Device,
        _ => ErrorType::Runtime,
    }
}
