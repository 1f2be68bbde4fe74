//! System Diagnostics
//!
//! Startup information for bug reports: host, kernel, and whether the
//! device nodes the daemon needs are accessible to the current user.

use std::path::Path;

use nix::unistd::{access, AccessFlags, Uid};
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use tracing::{info, warn};

/// Path of the uinput control node
pub const UINPUT_PATH: &str = "/dev/uinput";

/// System information for diagnostics
#[derive(Debug, Clone)]
pub struct SystemInfo {
    /// Operating system name (e.g., "Linux", "Ubuntu")
    pub os_name: String,
    /// Operating system version string
    pub os_version: String,

    /// Kernel version string
    pub kernel_version: String,

    /// Number of logical CPU cores
    pub cpu_count: usize,

    /// System hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Gather system information
    pub fn gather() -> Self {
        let sys =
            System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::everything()));

        Self {
            os_name: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
            cpu_count: sys.cpus().len(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Log system information
    pub fn log(&self) {
        info!("=== System Information ===");
        info!("  OS: {} {}", self.os_name, self.os_version);
        info!("  Kernel: {}", self.kernel_version);
        info!("  Hostname: {}", self.hostname);
        info!("  CPUs: {}", self.cpu_count);
    }
}

/// Access the current user has to a device node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAccess {
    /// Readable and writable
    ReadWrite,
    /// Readable only
    ReadOnly,
    /// Exists but not accessible
    Denied,
    /// Does not exist
    Missing,
}

/// Check read/write access to a device node
pub fn check_node_access(path: &Path) -> NodeAccess {
    if !path.exists() {
        return NodeAccess::Missing;
    }

    if access(path, AccessFlags::R_OK | AccessFlags::W_OK).is_ok() {
        NodeAccess::ReadWrite
    } else if access(path, AccessFlags::R_OK).is_ok() {
        NodeAccess::ReadOnly
    } else {
        NodeAccess::Denied
    }
}

/// Log complete diagnostics on startup
pub fn log_startup_diagnostics(device: &Path) {
    info!("╔════════════════════════════════════════════════════════════╗");
    info!("║          Startup Diagnostics                               ║");
    info!("╚════════════════════════════════════════════════════════════╝");

    let sys_info = SystemInfo::gather();
    sys_info.log();

    info!("=== Device Access ===");
    info!(
        "  Effective user: {}{}",
        Uid::effective(),
        if Uid::effective().is_root() { " (root)" } else { "" }
    );

    // Grabbing needs read access only; uinput needs write
    match check_node_access(device) {
        NodeAccess::ReadWrite | NodeAccess::ReadOnly => {
            info!("  Input device: {:?} accessible", device)
        }
        NodeAccess::Denied => warn!("  Input device: {:?} permission denied", device),
        NodeAccess::Missing => warn!("  Input device: {:?} does not exist", device),
    }

    match check_node_access(Path::new(UINPUT_PATH)) {
        NodeAccess::ReadWrite => info!("  uinput: {} writable", UINPUT_PATH),
        NodeAccess::ReadOnly | NodeAccess::Denied => {
            warn!("  uinput: {} not writable", UINPUT_PATH)
        }
        NodeAccess::Missing => warn!("  uinput: {} missing (modprobe uinput)", UINPUT_PATH),
    }

    info!("=== Build ===");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));
    #[cfg(debug_assertions)]
    info!("  Build: debug");
    #[cfg(not(debug_assertions))]
    info!("  Build: release");

    info!("╚════════════════════════════════════════════════════════════╝");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_info_gather() {
        let info = SystemInfo::gather();
        assert!(!info.os_name.is_empty());
        assert!(!info.kernel_version.is_empty());
    }

    #[test]
    fn test_missing_node() {
        assert_eq!(
            check_node_access(Path::new("/dev/input/does-not-exist")),
            NodeAccess::Missing
        );
    }

    #[test]
    fn test_readable_node() {
        // /proc/self/status is readable by every user
        let access = check_node_access(Path::new("/proc/self/status"));
        assert!(matches!(access, NodeAccess::ReadOnly | NodeAccess::ReadWrite));
    }

    #[test]
    fn test_owned_file_is_read_write() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(check_node_access(file.path()), NodeAccess::ReadWrite);
    }
}
