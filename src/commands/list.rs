//! List command implementation
//!
//! Enumerates AMD cards with their matched monitor group and driver
//! version.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, CardList, CardListEntry};
use crate::commands::{registry, selected_devices};
use crate::error::Result;
use crate::gpu::GpuDevice;

/// Execute the list command
pub fn run_list(format: OutputFormat, card: Option<u32>) -> Result<()> {
    let registry = registry();
    let store = registry.store().clone();

    let cards = selected_devices(&registry, card)?
        .into_iter()
        .map(|device| {
            let monitor = store
                .resolve_monitor(device.card())
                .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()));
            let driver = store.read(device.card(), "driver");
            CardListEntry {
                card: device.card().to_string(),
                index: device.index(),
                monitor,
                driver,
            }
        })
        .collect();

    print_output(&CardList { cards }, format)?;
    Ok(())
}
