//! Trait definitions for GPU operations
//!
//! These traits abstract over the sysfs backend to enable testing with
//! mocks.

use crate::domain::{FanMode, FanPercent, Temperature};
use crate::error::{FanControlError, RegistryError};

/// One fan reading: derived percentage plus the raw native values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanReading {
    /// Duty cycle as a percentage of the device maximum
    pub percent: f64,
    /// Current duty in device-native units
    pub raw: u32,
    /// Device-native maximum duty
    pub max: u32,
}

/// Per-tick snapshot of the control-relevant sensors of one device
///
/// All values in one sample come from a single poll against a single
/// monitor resolution, so a control decision never mixes readings from
/// different cycles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpuSample {
    /// Maximum across the device's temperature sensors
    pub temperature: Option<Temperature>,
    /// Current fan state, absent if duty or maximum is unreadable
    pub fan: Option<FanReading>,
}

/// Trait for GPU device operations
///
/// This trait abstracts all per-device sysfs access, allowing for mock
/// implementations in tests while using the real store in production.
pub trait GpuDevice: Send + Sync {
    /// The DRM card name, e.g. `card0`
    fn card(&self) -> &str;

    /// The numeric card index
    fn index(&self) -> u32;

    /// Read the device temperature
    ///
    /// The maximum across up to 3 labeled sensors; `None` only if no
    /// sensor could be read.
    fn read_temperature(&self) -> Option<Temperature>;

    /// Read the current fan duty as a percentage of the device maximum
    ///
    /// `None` if either the duty or the maximum is unavailable, or the
    /// maximum is zero.
    fn read_fan_percent(&self) -> Option<f64>;

    /// Read the device-native maximum duty value
    fn read_fan_max(&self) -> Option<u32>;

    /// Take the per-tick snapshot of temperature and fan state
    fn sample(&self) -> GpuSample {
        GpuSample {
            temperature: self.read_temperature(),
            fan: self.read_fan_percent().and_then(|percent| {
                let max = self.read_fan_max()?;
                Some(FanReading {
                    percent,
                    raw: (percent * max as f64 / 100.0) as u32,
                    max,
                })
            }),
        }
    }

    /// Set the fan duty cycle
    ///
    /// Takes manual ownership of the fan first if the hardware is still
    /// in automatic mode. Reads the native maximum fresh; callers that
    /// hold a snapshot use [`GpuDevice::apply_fan_percent`] instead.
    fn set_fan_percent(&mut self, percent: FanPercent) -> Result<(), FanControlError> {
        self.apply_fan_percent(percent, None)
    }

    /// Set the fan duty cycle against an already-known native maximum
    ///
    /// `max` carries the snapshot's maximum so the write scales against
    /// the same resolution the decision was made from; `None` falls back
    /// to a fresh read.
    fn apply_fan_percent(
        &mut self,
        percent: FanPercent,
        max: Option<u32>,
    ) -> Result<(), FanControlError>;

    /// Switch between automatic and manual fan control
    fn set_fan_mode(&mut self, mode: FanMode) -> Result<(), FanControlError>;
}

/// Trait for enumerating controllable GPUs
pub trait GpuManager: Send + Sync {
    /// The device type returned by this manager
    type Device: GpuDevice;

    /// Enumerate all controllable devices, ordered by ascending index
    fn list_devices(&self) -> Result<Vec<Self::Device>, RegistryError>;

    /// Get a device by numeric index
    fn device_by_index(&self, index: u32) -> Result<Option<Self::Device>, RegistryError> {
        Ok(self
            .list_devices()?
            .into_iter()
            .find(|device| device.index() == index))
    }
}
