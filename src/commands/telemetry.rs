//! Telemetry command implementation
//!
//! Reads auxiliary catalogue keys and normalizes the handful of values
//! that are not plain single-line numbers. Normalization lives here,
//! not in the catalogue, which stays a pure path table.

use crate::cli::args::{OutputFormat, TelemetryArgs};
use crate::cli::output::{print_output, TelemetryReport, TelemetryValue};
use crate::commands::{registry, selected_devices};
use crate::error::{AppError, Result};
use crate::gpu::GpuDevice;
use crate::sysfs::SysfsStore;

/// Keys that trigger actions rather than report values
const NON_DISPLAY_KEYS: &[&str] = &["ras_ctrl", "gpu_reset"];

/// Execute the telemetry command
pub fn run_telemetry(args: &TelemetryArgs, format: OutputFormat, card: Option<u32>) -> Result<()> {
    let registry = registry();
    let store = registry.store().clone();

    let keys: Vec<String> = if args.keys.is_empty() {
        store
            .catalog()
            .keys()
            .into_iter()
            .filter(|key| !NON_DISPLAY_KEYS.contains(key))
            .map(str::to_string)
            .collect()
    } else {
        for key in &args.keys {
            if !store.catalog().contains(key) {
                return Err(AppError::UnknownKey(key.clone()));
            }
        }
        args.keys.clone()
    };

    for device in selected_devices(&registry, card)? {
        let values = keys
            .iter()
            .map(|key| TelemetryValue {
                key: key.clone(),
                value: read_display_value(&store, device.card(), key),
            })
            .collect();
        let report = TelemetryReport {
            card: device.card().to_string(),
            values,
        };
        print_output(&report, format)?;
    }

    Ok(())
}

/// Read a key and normalize it for display
fn read_display_value(store: &SysfsStore, card: &str, key: &str) -> Option<String> {
    let raw = store.read(card, key)?;
    display_value(key, &raw)
}

/// Normalize a raw sysfs value for display
///
/// Most files are plain single-line values; the exceptions are encoded
/// per the kernel interface:
/// - `id` carries a `0x` prefix worth stripping
/// - `temp1..3` are integer millidegrees
/// - `power` is integer microwatts (or an error string when unavailable)
/// - `ras_features` has a `feature mask: 0x%x` first line
/// - `smc`/`ta_ras`/`ta_xgmi` firmware versions are hex registers
///   rendered as dotted decimal
fn display_value(key: &str, raw: &str) -> Option<String> {
    match key {
        "id" => Some(raw.strip_prefix("0x").unwrap_or(raw).to_string()),
        "temp1" | "temp2" | "temp3" => {
            let millidegrees: i64 = raw.parse().ok()?;
            Some(format!("{}", millidegrees as f64 / 1000.0))
        }
        "power" => {
            let microwatts: u64 = raw.parse().ok()?;
            Some(format!("{}", microwatts as f64 / 1_000_000.0))
        }
        "ras_features" => {
            let first_line = raw.lines().next()?;
            let mask = first_line.rsplit(' ').next()?;
            let value = u64::from_str_radix(mask.trim_start_matches("0x"), 16).ok()?;
            Some(format!("{:#x}", value))
        }
        "smc_fw_version" | "ta_ras_fw_version" | "ta_xgmi_fw_version" => {
            dotted_fw_version(raw)
        }
        _ => Some(raw.to_string()),
    }
}

/// Render a `0x12345678` firmware register as `18.52.86.120`
fn dotted_fw_version(raw: &str) -> Option<String> {
    let hex = raw.strip_prefix("0x")?;
    if hex.len() < 8 {
        return None;
    }
    let bytes: Vec<u8> = (0..4)
        .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16))
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    Some(format!(
        "{:02}.{:02}.{:02}.{:02}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    ))
}
