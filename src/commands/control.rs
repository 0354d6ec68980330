//! Control command implementation
//!
//! Builds the effective configuration and runs the control loop.

use crate::cli::args::ControlArgs;
use crate::commands::registry;
use crate::config::ConfigBuilder;
use crate::error::Result;
use crate::gpu::{GpuDevice, GpuManager};
use crate::services::{Monitor, MonitorConfig};

use std::time::Duration;

/// Execute the control command
pub fn run_control(
    args: &ControlArgs,
    config_path: Option<&str>,
    card: Option<u32>,
    dry_run: bool,
) -> Result<()> {
    let config = ConfigBuilder::new()
        .with_file(config_path)
        .with_dry_run(dry_run)
        .with_interval(args.interval)
        .with_min_speed(args.min_speed)
        .with_cold(args.cold)
        .with_hot(args.hot)
        .with_step(args.fan_step)
        .build();

    let monitor_config = MonitorConfig {
        interval: Duration::from_secs(config.general.interval_seconds),
        status_every: config.general.status_every,
        single_use: args.single_use,
        dry_run: config.general.dry_run,
        policy: config.fan.to_policy()?,
    };

    let manager = FilteredManager {
        inner: registry(),
        card,
    };
    Monitor::new(manager, monitor_config).run();
    Ok(())
}

/// Narrows enumeration to one card when `--card` was given
struct FilteredManager<M: GpuManager> {
    inner: M,
    card: Option<u32>,
}

impl<M: GpuManager> GpuManager for FilteredManager<M> {
    type Device = M::Device;

    fn list_devices(&self) -> std::result::Result<Vec<M::Device>, crate::error::RegistryError> {
        let mut devices = self.inner.list_devices()?;
        if let Some(index) = self.card {
            devices.retain(|device| device.index() == index);
        }
        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockManager};

    #[test]
    fn test_filtered_manager_narrows_to_card() {
        let manager = FilteredManager {
            inner: MockManager::with_devices(vec![MockDevice::new(0), MockDevice::new(1)]),
            card: Some(1),
        };

        let devices = manager.list_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].card(), "card1");
    }

    #[test]
    fn test_filtered_manager_passthrough_without_card() {
        let manager = FilteredManager {
            inner: MockManager::with_devices(vec![MockDevice::new(0), MockDevice::new(1)]),
            card: None,
        };

        assert_eq!(manager.list_devices().unwrap().len(), 2);
    }
}
