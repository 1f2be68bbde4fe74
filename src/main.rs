//! mouse-autoscroll - hold-to-scroll daemon
//!
//! Entry point for the daemon binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

use mouse_autoscroll::config::tuning::{DEFAULT_DPI, DEFAULT_TICK_INTERVAL_US};
use mouse_autoscroll::config::{Config, DEFAULT_VIRTUAL_NAME};
use mouse_autoscroll::daemon::AutoscrollDaemon;
use mouse_autoscroll::input::MouseButton;
use mouse_autoscroll::utils::{format_user_error, log_startup_diagnostics};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Command-line arguments for mouse-autoscroll
#[derive(Parser, Debug)]
#[command(name = "mouse-autoscroll")]
#[command(version, about = "Hold a mouse button and move to scroll", long_about = None)]
pub struct Args {
    /// Input device to grab (e.g. /dev/input/by-id/usb-...-event-mouse)
    #[arg(env = "AUTOSCROLL_DEVICE")]
    pub device: PathBuf,

    /// Device resolution in dots per inch
    #[arg(long, env = "AUTOSCROLL_DPI", default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Speed adjustment, -1 (slowest) to 1 (fastest)
    #[arg(long, env = "AUTOSCROLL_SPEED", default_value_t = 0.0, allow_hyphen_values = true)]
    pub speed: f64,

    /// Scroll tick interval in microseconds
    #[arg(long, env = "AUTOSCROLL_TICK_INTERVAL_US", default_value_t = DEFAULT_TICK_INTERVAL_US)]
    pub tick_interval_us: u64,

    /// Button that taps space while scrolling is armed
    #[arg(long, value_enum, default_value_t = MouseButton::Left)]
    pub primary_button: MouseButton,

    /// Button that arms scrolling while held
    #[arg(long, value_enum, default_value_t = MouseButton::Right)]
    pub secondary_button: MouseButton,

    /// Scroll content along with the pointer
    #[arg(long, env = "AUTOSCROLL_NATURAL_SCROLLING")]
    pub natural_scrolling: bool,

    /// Emit only high-resolution wheel events
    #[arg(long)]
    pub no_legacy_wheel: bool,

    /// Name prefix for the virtual devices
    #[arg(long, default_value = DEFAULT_VIRTUAL_NAME)]
    pub virtual_name: String,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Write logs to file (in addition to stdout)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    fn to_config(&self) -> Config {
        Config {
            device: self.device.clone(),
            dpi: self.dpi,
            speed: self.speed,
            tick_interval_us: self.tick_interval_us,
            primary_button: self.primary_button,
            secondary_button: self.secondary_button,
            natural_scrolling: self.natural_scrolling,
            legacy_wheel: !self.no_legacy_wheel,
            virtual_name: self.virtual_name.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config();

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_logging(&args)?;

    info!("════════════════════════════════════════════════════════");
    info!("  mouse-autoscroll v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");

    log_startup_diagnostics(&config.device);

    if let Err(e) = config.validate().context("Invalid configuration") {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }
    tracing::debug!("Config: {:?}", config);

    let daemon = match AutoscrollDaemon::new(config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", format_user_error(&e));
            return Err(e);
        }
    };

    if let Err(e) = daemon.run().await {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }

    Ok(())
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);

    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

fn init_logging(args: &Args) -> Result<()> {
    use std::fs::File;

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("mouse_autoscroll={},warn", log_level))
    });

    let mut layers = vec![fmt_layer(args.log_format, std::io::stdout, true)];

    // If log file is specified, write to both stdout and file
    if let Some(log_file_path) = &args.log_file {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file {:?}", log_file_path))?;
        layers.push(fmt_layer(args.log_format, file, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    if let Some(log_file_path) = &args.log_file {
        info!("Logging to file: {:?}", log_file_path);
    }

    Ok(())
}
