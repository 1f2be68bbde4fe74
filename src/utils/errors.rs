//! User-Friendly Error Formatting
//!
//! Provides user-friendly error messages with troubleshooting hints
//! for common error scenarios.

use std::fmt::Write;

use crate::input::{classify_error, DeviceError, ErrorType};

/// Format error for user consumption
///
/// Takes technical error and produces user-friendly message with
/// troubleshooting steps and context.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    // Header
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    let device_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DeviceError>());

    match device_error {
        Some(device_error) => format_device_error(&mut output, device_error),
        None if error.to_string().contains("configuration") => {
            format_config_error(&mut output)
        }
        None => format_generic_error(&mut output, &error.to_string()),
    }

    // Technical details
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    // Footer with help
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: mouse-autoscroll -vvv <DEVICE>"
    )
    .ok();
    writeln!(
        &mut output,
        "  - Inspect the device with: sudo evtest <DEVICE>"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();

    output
}

fn format_device_error(output: &mut String, error: &DeviceError) {
    let uinput = matches!(error, DeviceError::VirtualDevice { .. });

    match (classify_error(error), uinput) {
        (ErrorType::Access, true) => format_uinput_access_error(output),
        (ErrorType::Access, false) => format_input_access_error(output),
        (ErrorType::Missing, true) => format_uinput_missing_error(output),
        (ErrorType::Missing, false) => format_input_missing_error(output),
        (ErrorType::Device, _) => format_wrong_device_error(output, error),
        (ErrorType::Runtime, _) => format_runtime_error(output),
    }
}

fn format_input_access_error(output: &mut String) {
    writeln!(output, "Input Device Permission Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not open the mouse's event device.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Your user is not in the input group").ok();
    writeln!(output, "     → Run: sudo usermod -aG input $USER").ok();
    writeln!(output, "     → Log out and log back in").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Device node is root-only").ok();
    writeln!(output, "     → Check: ls -l /dev/input/event*").ok();
    writeln!(output, "     → Or run as root (not recommended)").ok();
}

fn format_uinput_access_error(output: &mut String) {
    writeln!(output, "Virtual Device Permission Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not create virtual devices through /dev/uinput.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. /dev/uinput is root-only").ok();
    writeln!(output, "     → Check: ls -l /dev/uinput").ok();
    writeln!(
        output,
        "     → Add a udev rule: KERNEL==\"uinput\", GROUP=\"input\", MODE=\"0660\""
    )
    .ok();
    writeln!(output, "     → Reload: sudo udevadm control --reload && sudo udevadm trigger").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Your user is not in the input group").ok();
    writeln!(output, "     → Run: sudo usermod -aG input $USER").ok();
}

fn format_input_missing_error(output: &mut String) {
    writeln!(output, "Input Device Not Found").ok();
    writeln!(output).ok();
    writeln!(output, "The device path does not exist.").ok();
    writeln!(output).ok();
    writeln!(output, "Finding the Right Device:").ok();
    writeln!(output).ok();
    writeln!(output, "  → List stable names: ls -l /dev/input/by-id/*-event-mouse").ok();
    writeln!(output, "  → Or list all devices: sudo evtest").ok();
    writeln!(
        output,
        "  → Prefer /dev/input/by-id paths; eventN numbers change across boots"
    )
    .ok();
}

fn format_uinput_missing_error(output: &mut String) {
    writeln!(output, "uinput Not Available").ok();
    writeln!(output).ok();
    writeln!(output, "/dev/uinput does not exist.").ok();
    writeln!(output).ok();
    writeln!(output, "  → Load the module: sudo modprobe uinput").ok();
    writeln!(
        output,
        "  → Load at boot: echo uinput | sudo tee /etc/modules-load.d/uinput.conf"
    )
    .ok();
}

fn format_wrong_device_error(output: &mut String, error: &DeviceError) {
    match error {
        DeviceError::NotAPointer { name, .. } => {
            writeln!(output, "Not a Mouse").ok();
            writeln!(output).ok();
            writeln!(
                output,
                "'{}' does not report relative pointer motion.",
                name
            )
            .ok();
            writeln!(output).ok();
            writeln!(output, "  → Pick the event node of your mouse: sudo evtest").ok();
            writeln!(
                output,
                "  → Mice often expose several nodes; use the one with REL_X/REL_Y"
            )
            .ok();
        }
        DeviceError::Grab { .. } => {
            writeln!(output, "Device Busy").ok();
            writeln!(output).ok();
            writeln!(output, "Another program holds an exclusive grab on the device.").ok();
            writeln!(output).ok();
            writeln!(output, "  → Check for another autoscroll instance: pgrep -a mouse-autoscroll").ok();
            writeln!(output, "  → Remappers (input-remapper, evsieve) grab devices too").ok();
        }
        _ => {
            writeln!(output, "Device Error").ok();
            writeln!(output).ok();
            writeln!(output, "{}", error).ok();
        }
    }
}

fn format_runtime_error(output: &mut String) {
    writeln!(output, "Device Disconnected").ok();
    writeln!(output).ok();
    writeln!(output, "Reading from or writing to a device failed while running.").ok();
    writeln!(output).ok();
    writeln!(output, "  → The mouse may have been unplugged or gone to sleep").ok();
    writeln!(output, "  → Restart the daemon once the device is back").ok();
}

fn format_config_error(output: &mut String) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "A command line option or environment variable is invalid.").ok();
    writeln!(output).ok();
    writeln!(output, "  → See: mouse-autoscroll --help").ok();
    writeln!(output, "  → Show resolved values: mouse-autoscroll --print-config <DEVICE>").ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Autoscroll Error").ok();
    writeln!(output).ok();
    writeln!(output, "An error occurred while running the daemon.").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
}
