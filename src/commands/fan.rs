//! Fan command implementation
//!
//! Handles one-shot fan speed and mode changes.

use crate::cli::args::{FanArgs, FanCommands, FanModeArg, OutputFormat};
use crate::cli::output::{print_output, Message};
use crate::commands::{registry, selected_devices};
use crate::domain::{FanMode, FanPercent};
use crate::error::Result;
use crate::gpu::GpuDevice;

/// Execute fan commands
pub fn run_fan(args: &FanArgs, format: OutputFormat, card: Option<u32>, dry_run: bool) -> Result<()> {
    match &args.command {
        FanCommands::Speed { percent } => run_fan_speed(*percent, format, card, dry_run),
        FanCommands::Mode { mode } => run_fan_mode(*mode, format, card, dry_run),
    }
}

fn run_fan_speed(percent: f64, format: OutputFormat, card: Option<u32>, dry_run: bool) -> Result<()> {
    let speed = FanPercent::new(percent)?;
    let registry = registry();

    for mut device in selected_devices(&registry, card)? {
        let message = if dry_run {
            format!("[DRY RUN] Would set {} fan speed to {}", device.card(), speed)
        } else {
            device.set_fan_percent(speed)?;
            format!("Set {} fan speed to {}", device.card(), speed)
        };

        print_output(
            &Message {
                message,
                success: true,
            },
            format,
        )?;
    }

    Ok(())
}

fn run_fan_mode(
    mode_arg: FanModeArg,
    format: OutputFormat,
    card: Option<u32>,
    dry_run: bool,
) -> Result<()> {
    let mode = match mode_arg {
        FanModeArg::Auto => FanMode::Auto,
        FanModeArg::Manual => FanMode::Manual,
    };
    let registry = registry();

    for mut device in selected_devices(&registry, card)? {
        let message = if dry_run {
            format!("[DRY RUN] Would set {} fan control to {}", device.card(), mode)
        } else {
            device.set_fan_mode(mode)?;
            format!("Set {} fan control to {}", device.card(), mode)
        };

        print_output(
            &Message {
                message,
                success: true,
            },
            format,
        )?;
    }

    Ok(())
}
