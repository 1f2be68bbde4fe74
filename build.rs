//! Build script for mouse-autoscroll
//!
//! Stamps build date, time and commit into the binary for the startup banner.

use std::process::Command;

/// Trimmed stdout of a successful command, if any
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    let date = command_output("date", &["+%Y-%m-%d"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=BUILD_DATE={}", date);

    let time = command_output("date", &["+%H:%M:%S"]).unwrap_or_default();
    println!("cargo:rustc-env=BUILD_TIME={}", time);

    // Source tarballs have no .git
    let git_hash = command_output("git", &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_HASH={}", git_hash);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
