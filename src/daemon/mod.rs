//! Daemon orchestration
//!
//! Wires the configured devices to the gesture core and runs the event loop.
//!
//! # Architecture
//!
//! ```text
//! AutoscrollDaemon
//!   ├─> EvdevSource     (grabbed physical pointer)
//!   ├─> GestureContext  (state machine + scroll integrator)
//!   ├─> VirtualDevices  (uinput pointer + keyboard)
//!   └─> event_loop::run (input and ticker on one task)
//! ```
//!
//! # Lifecycle
//!
//! Startup failures (open, grab, uinput) are returned from [`AutoscrollDaemon::new`]
//! before anything is written. At runtime a read or write failure ends the
//! loop with an error. Ctrl-C or SIGTERM end it cleanly; dropping the daemon
//! releases the grab and destroys the virtual devices.
//!
//! # Example
//!
//! ```no_run
//! use mouse_autoscroll::config::Config;
//! use mouse_autoscroll::daemon::AutoscrollDaemon;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default_config("/dev/input/event5");
//!     let daemon = AutoscrollDaemon::new(config)?;
//!     daemon.run().await?;
//!     Ok(())
//! }
//! ```

pub mod event_loop;

pub use event_loop::{run, LoopStats};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::gesture::GestureContext;
use crate::input::{EvdevSource, MonotonicClock, VirtualDevices};

/// The running daemon: one grabbed device, one virtual device pair
pub struct AutoscrollDaemon {
    config: Config,
    clock: MonotonicClock,
    source: EvdevSource,
    devices: VirtualDevices,
    ctx: GestureContext,
}

impl AutoscrollDaemon {
    /// Create the virtual devices, then open, check and grab the input device
    ///
    /// Must be called from within the tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing autoscroll daemon");
        config.validate()?;

        let clock = MonotonicClock::new();

        // uinput before the grab, so a failure here leaves the pointer untouched
        let devices = VirtualDevices::create(&config.virtual_name)
            .context("Failed to set up virtual output devices")?;

        let source = EvdevSource::open(&config.device, clock)
            .with_context(|| format!("Failed to set up input device {:?}", config.device))?;

        let ctx = GestureContext::new(config.to_gesture_settings(), clock.now_us());
        debug!("Acceleration profile: {:?}", ctx.profile());

        Ok(Self {
            config,
            clock,
            source,
            devices,
            ctx,
        })
    }

    /// Run until interrupted or a device fails
    pub async fn run(mut self) -> Result<LoopStats> {
        info!("╔════════════════════════════════════════════════════════════╗");
        info!("║          Autoscroll is Running                             ║");
        info!("╚════════════════════════════════════════════════════════════╝");
        info!("  Device: {:?} ({})", self.source.path(), self.source.name());
        info!(
            "  Buttons: primary={:?} secondary={:?}",
            self.config.primary_button, self.config.secondary_button
        );
        info!("  DPI: {}  Speed: {:+.2}", self.config.dpi, self.config.speed);
        info!("  Tick interval: {:?}", self.config.tick_interval());
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let result = event_loop::run(
            &mut self.ctx,
            &mut self.source,
            &mut self.devices,
            self.clock,
            self.config.tick_interval(),
            shutdown_signal(),
        )
        .await
        .context("Event loop stopped");

        match &result {
            Ok(stats) => {
                stats.log();
                info!("Autoscroll daemon stopped");
            }
            Err(e) => warn!("Autoscroll daemon stopped with error: {:#}", e),
        }

        result
    }
}

impl Drop for AutoscrollDaemon {
    fn drop(&mut self) {
        debug!("AutoscrollDaemon dropped - releasing grab and virtual devices");
    }
}

/// Resolve on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let mut config = Config::default_config("/dev/input/event5");
        config.speed = 4.0;
        assert!(AutoscrollDaemon::new(config).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires /dev/uinput and a pointer device
    async fn test_daemon_initialization() {
        let config = Config::default_config("/dev/input/event5");
        assert!(AutoscrollDaemon::new(config).is_ok());
    }
}
