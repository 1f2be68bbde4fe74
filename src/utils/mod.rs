//! Utility Functions and Diagnostics
//!
//! Startup diagnostics and user-friendly error formatting.
//!
//! ## Diagnostics
//!
//! The [`diagnostics`] module logs the runtime environment at startup:
//!
//! ```rust,no_run
//! use mouse_autoscroll::utils::{check_node_access, NodeAccess, SystemInfo};
//! use std::path::Path;
//!
//! let sys_info = SystemInfo::gather();
//! sys_info.log();  // Logs: OS, kernel, hostname, CPU count
//!
//! if check_node_access(Path::new("/dev/uinput")) != NodeAccess::ReadWrite {
//!     eprintln!("uinput is not writable");
//! }
//! ```
//!
//! ## Error Formatting
//!
//! The [`errors`] module turns fatal errors into messages with
//! troubleshooting steps:
//!
//! ```rust,no_run
//! use mouse_autoscroll::utils::format_user_error;
//!
//! # fn operation() -> anyhow::Result<()> { Ok(()) }
//! if let Err(e) = operation() {
//!     eprintln!("{}", format_user_error(&e));
//! }
//! ```
//!
//! Error categories with context-aware help:
//! - Input device permissions → `input` group membership
//! - uinput permissions or absence → udev rule, `modprobe uinput`
//! - Wrong device or busy device → picking the right event node
//! - Invalid options → `--help`, `--print-config`

pub mod diagnostics;
pub mod errors;

pub use diagnostics::{check_node_access, log_startup_diagnostics, NodeAccess, SystemInfo};
pub use errors::format_user_error;
