//! Status command implementation
//!
//! One-shot temperature/fan snapshot per card.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, CardStatus};
use crate::commands::{registry, selected_devices};
use crate::error::Result;
use crate::gpu::GpuDevice;

/// Execute the status command
pub fn run_status(format: OutputFormat, card: Option<u32>) -> Result<()> {
    let registry = registry();

    for device in selected_devices(&registry, card)? {
        let sample = device.sample();
        let status = CardStatus {
            card: device.card().to_string(),
            index: device.index(),
            temperature_celsius: sample.temperature.map(|t| t.as_celsius()),
            fan_percent: sample.fan.map(|f| f.percent),
        };
        print_output(&status, format)?;
    }

    Ok(())
}
