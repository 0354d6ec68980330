//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod control;
pub mod fan;
pub mod list;
pub mod status;
pub mod telemetry;

pub use control::run_control;
pub use fan::run_fan;
pub use list::run_list;
pub use status::run_status;
pub use telemetry::run_telemetry;

use crate::error::{AppError, Result};
use crate::gpu::{CardDevice, CardRegistry, GpuDevice, GpuManager};
use crate::sysfs::{Catalog, SysfsStore};

use std::sync::Arc;

/// Create the registry over the real sysfs tree
pub(crate) fn registry() -> CardRegistry {
    CardRegistry::new(Arc::new(SysfsStore::new(Catalog::amdgpu())))
}

/// Enumerate devices, narrowed to one card when `--card` was given
pub(crate) fn selected_devices(
    registry: &CardRegistry,
    card: Option<u32>,
) -> Result<Vec<CardDevice>> {
    let devices = registry.list_devices()?;
    match card {
        Some(index) => {
            let device = devices
                .into_iter()
                .find(|device| device.index() == index)
                .ok_or(AppError::CardNotFound(index))?;
            Ok(vec![device])
        }
        None => Ok(devices),
    }
}
