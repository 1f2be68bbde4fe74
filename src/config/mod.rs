//! Configuration management
//!
//! The daemon has no configuration file. Settings come from CLI arguments
//! and environment variables (parsed in the binary), land in [`Config`] and
//! are validated once before any device is touched.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

pub mod tuning;

use crate::gesture::GestureSettings;
use crate::input::{ButtonBinding, MouseButton};
use tuning::{DEFAULT_DPI, DEFAULT_TICK_INTERVAL_US};

/// Default prefix for the virtual device names
pub const DEFAULT_VIRTUAL_NAME: &str = "mouse-autoscroll";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Input device node to grab
    pub device: PathBuf,
    /// Device resolution in dots per inch
    pub dpi: u32,
    /// Speed adjustment in [-1, 1]
    pub speed: f64,
    /// Scroll integrator tick interval in microseconds
    pub tick_interval_us: u64,
    /// Button that taps space while the gesture is armed
    pub primary_button: MouseButton,
    /// Button that arms the gesture
    pub secondary_button: MouseButton,
    /// Scroll content with the pointer instead of against it
    pub natural_scrolling: bool,
    /// Emit notch wheel events alongside high-resolution units
    pub legacy_wheel: bool,
    /// Prefix of the virtual device names
    pub virtual_name: String,
}

impl Config {
    /// Create default configuration for a device
    pub fn default_config(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
            dpi: DEFAULT_DPI,
            speed: 0.0,
            tick_interval_us: DEFAULT_TICK_INTERVAL_US,
            primary_button: MouseButton::Left,
            secondary_button: MouseButton::Right,
            natural_scrolling: false,
            legacy_wheel: true,
            virtual_name: DEFAULT_VIRTUAL_NAME.to_string(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.device.as_os_str().is_empty() {
            anyhow::bail!("device: path is empty");
        }

        if self.dpi == 0 {
            anyhow::bail!("dpi: must be greater than zero");
        }

        if !self.speed.is_finite() || !(-1.0..=1.0).contains(&self.speed) {
            anyhow::bail!("speed: {} is outside [-1, 1]", self.speed);
        }

        if self.tick_interval_us == 0 {
            anyhow::bail!("tick_interval_us: must be greater than zero");
        }

        if self.primary_button == self.secondary_button {
            anyhow::bail!(
                "primary_button and secondary_button are both {:?}",
                self.primary_button
            );
        }

        if self.virtual_name.trim().is_empty() {
            anyhow::bail!("virtual_name: must not be empty");
        }

        Ok(())
    }

    /// Settings for the gesture core
    pub fn to_gesture_settings(&self) -> GestureSettings {
        GestureSettings {
            binding: ButtonBinding::new(self.primary_button, self.secondary_button),
            dpi: self.dpi,
            speed_adjustment: self.speed,
            natural_scrolling: self.natural_scrolling,
            legacy_wheel: self.legacy_wheel,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(self.tick_interval_us)
    }
}
