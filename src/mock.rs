//! Mock implementations for testing
//!
//! Provides mock GPU device and manager for unit testing without real
//! hardware. Devices are cheaply cloneable handles over shared state,
//! so a test can keep its own handle and observe writes applied through
//! the manager's copy.

use crate::domain::{FanMode, FanPercent, Temperature};
use crate::error::{FanControlError, RegistryError, SysfsWriteError};
use crate::gpu::{GpuDevice, GpuManager};

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct MockInner {
    card: String,
    index: u32,
    temperature: Mutex<Option<f64>>,
    fan_percent: Mutex<Option<f64>>,
    fan_max: u32,
    dpm_available: bool,
    fail_writes: Mutex<bool>,
    mode: Mutex<FanMode>,
    applied: Mutex<Vec<f64>>,
}

/// Mock GPU device for testing
#[derive(Debug, Clone)]
pub struct MockDevice {
    inner: Arc<MockInner>,
}

impl MockDevice {
    /// Create a mock device with default readings
    pub fn new(index: u32) -> Self {
        Self::build(index, true)
    }

    /// Create a mock device whose DPM is unavailable, making fan
    /// control permanently unsupported
    pub fn without_dpm(index: u32) -> Self {
        Self::build(index, false)
    }

    fn build(index: u32, dpm_available: bool) -> Self {
        Self {
            inner: Arc::new(MockInner {
                card: format!("card{}", index),
                index,
                temperature: Mutex::new(Some(45.0)),
                fan_percent: Mutex::new(Some(50.0)),
                fan_max: 255,
                dpm_available,
                fail_writes: Mutex::new(false),
                mode: Mutex::new(FanMode::Auto),
                applied: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Set the reported temperature
    pub fn set_temperature(&self, celsius: f64) {
        *self.inner.temperature.lock().unwrap() = Some(celsius);
    }

    /// Make temperature reads fail
    pub fn clear_temperature(&self) {
        *self.inner.temperature.lock().unwrap() = None;
    }

    /// Set the reported fan percentage
    pub fn set_fan(&self, percent: f64) {
        *self.inner.fan_percent.lock().unwrap() = Some(percent);
    }

    /// Make fan reads fail
    pub fn clear_fan(&self) {
        *self.inner.fan_percent.lock().unwrap() = None;
    }

    /// Make fan writes fail transiently
    pub fn set_fail_writes(&self, fail: bool) {
        *self.inner.fail_writes.lock().unwrap() = fail;
    }

    /// Fan percentages applied through `set_fan_percent`, oldest first
    pub fn applied(&self) -> Vec<f64> {
        self.inner.applied.lock().unwrap().clone()
    }

    /// The current fan control mode
    pub fn mode(&self) -> FanMode {
        *self.inner.mode.lock().unwrap()
    }
}

impl GpuDevice for MockDevice {
    fn card(&self) -> &str {
        &self.inner.card
    }

    fn index(&self) -> u32 {
        self.inner.index
    }

    fn read_temperature(&self) -> Option<Temperature> {
        self.inner.temperature.lock().unwrap().map(Temperature::new)
    }

    fn read_fan_percent(&self) -> Option<f64> {
        *self.inner.fan_percent.lock().unwrap()
    }

    fn read_fan_max(&self) -> Option<u32> {
        Some(self.inner.fan_max)
    }

    fn apply_fan_percent(
        &mut self,
        percent: FanPercent,
        _max: Option<u32>,
    ) -> Result<(), FanControlError> {
        if !self.inner.dpm_available {
            return Err(FanControlError::Unsupported(self.inner.card.clone()));
        }
        if *self.inner.fail_writes.lock().unwrap() {
            return Err(FanControlError::Write(SysfsWriteError::PathNotFound(
                PathBuf::from("pwm1"),
            )));
        }
        *self.inner.mode.lock().unwrap() = FanMode::Manual;
        let value = percent.as_percentage();
        self.inner.applied.lock().unwrap().push(value);
        *self.inner.fan_percent.lock().unwrap() = Some(value);
        Ok(())
    }

    fn set_fan_mode(&mut self, mode: FanMode) -> Result<(), FanControlError> {
        *self.inner.mode.lock().unwrap() = mode;
        Ok(())
    }
}

/// Mock GPU manager for testing
#[derive(Debug, Default)]
pub struct MockManager {
    devices: Mutex<Vec<MockDevice>>,
    fail_enumeration: Mutex<bool>,
}

impl MockManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager over the given devices
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        Self {
            devices: Mutex::new(devices),
            fail_enumeration: Mutex::new(false),
        }
    }

    /// Add a device to enumeration
    pub fn add_device(&self, device: MockDevice) {
        self.devices.lock().unwrap().push(device);
    }

    /// Remove a device from enumeration, simulating hot-unplug
    pub fn remove_device(&self, card: &str) {
        self.devices.lock().unwrap().retain(|d| d.card() != card);
    }

    /// Make enumeration fail as if the DRM class directory were missing
    pub fn set_fail_enumeration(&self, fail: bool) {
        *self.fail_enumeration.lock().unwrap() = fail;
    }
}

impl GpuManager for MockManager {
    type Device = MockDevice;

    fn list_devices(&self) -> Result<Vec<MockDevice>, RegistryError> {
        if *self.fail_enumeration.lock().unwrap() {
            return Err(RegistryError::ClassMissing(PathBuf::from(
                "/sys/class/drm",
            )));
        }
        Ok(self.devices.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_device_readings() {
        let device = MockDevice::new(0);
        assert_eq!(device.card(), "card0");
        assert_eq!(device.read_temperature().unwrap().as_celsius(), 45.0);
        assert_eq!(device.read_fan_percent(), Some(50.0));
    }

    #[test]
    fn test_mock_device_applies_writes() {
        let handle = MockDevice::new(0);
        let mut device = handle.clone();
        device
            .set_fan_percent(FanPercent::new(60.0).unwrap())
            .unwrap();

        assert_eq!(handle.applied(), vec![60.0]);
        assert_eq!(handle.read_fan_percent(), Some(60.0));
        assert_eq!(handle.mode(), FanMode::Manual);
    }

    #[test]
    fn test_mock_manager_enumeration() {
        let manager = MockManager::with_devices(vec![MockDevice::new(0), MockDevice::new(1)]);
        assert_eq!(manager.list_devices().unwrap().len(), 2);

        manager.remove_device("card0");
        assert_eq!(manager.list_devices().unwrap().len(), 1);

        manager.set_fail_enumeration(true);
        assert!(manager.list_devices().is_err());
    }
}
