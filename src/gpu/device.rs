//! Sysfs device implementation
//!
//! Real implementation of the GpuDevice trait over a SysfsStore.

use crate::domain::{FanMode, FanPercent, Temperature};
use crate::error::FanControlError;
use crate::gpu::traits::{FanReading, GpuDevice, GpuSample};
use crate::sysfs::SysfsStore;

use std::path::Path;
use std::sync::Arc;

/// Number of independently labeled hwmon temperature sensors
const TEMP_SENSORS: u32 = 3;

/// One DRM card backed by the sysfs store
#[derive(Debug, Clone)]
pub struct CardDevice {
    card: String,
    index: u32,
    store: Arc<SysfsStore>,
}

impl CardDevice {
    /// Create a device handle from a `card<N>` name
    ///
    /// Returns `None` if the name does not match the pattern.
    pub fn new(card: &str, store: Arc<SysfsStore>) -> Option<Self> {
        let index = parse_card_index(card)?;
        Some(Self {
            card: card.to_string(),
            index,
            store,
        })
    }

    /// The store backing this device
    pub fn store(&self) -> &SysfsStore {
        &self.store
    }

    /// Whether DPM is exposed for this device
    ///
    /// Without DPM the hardware never honors manual fan writes, so fan
    /// control is permanently unsupported.
    pub fn dpm_available(&self) -> bool {
        self.store.resolve(&self.card, "dpm_state").is_some()
    }

    fn read_temp_sensor(&self, monitor: &Path, sensor: u32) -> Option<Temperature> {
        let raw = self
            .store
            .read_monitor_file(monitor, &format!("temp{}_input", sensor))?;
        let millidegrees: i64 = raw.parse().ok()?;
        Some(Temperature::from_millidegrees(millidegrees))
    }

    fn read_monitor_u32(&self, monitor: &Path, file: &str) -> Option<u32> {
        self.store
            .read_monitor_file(monitor, file)?
            .parse()
            .ok()
    }

    fn max_temperature(&self, monitor: &Path) -> Option<Temperature> {
        (1..=TEMP_SENSORS)
            .filter_map(|sensor| self.read_temp_sensor(monitor, sensor))
            .fold(None, |acc: Option<Temperature>, temp| match acc {
                Some(best) if best >= temp => Some(best),
                _ => Some(temp),
            })
    }

    fn fan_reading(&self, monitor: &Path) -> Option<FanReading> {
        let raw = self.read_monitor_u32(monitor, "pwm1")?;
        let max = self.read_monitor_u32(monitor, "pwm1_max")?;
        if max == 0 {
            log::warn!("GPU[{}]: fan maximum is zero", self.card);
            return None;
        }
        Some(FanReading {
            percent: 100.0 * raw as f64 / max as f64,
            raw,
            max,
        })
    }
}

impl GpuDevice for CardDevice {
    fn card(&self) -> &str {
        &self.card
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn read_temperature(&self) -> Option<Temperature> {
        let monitor = self.store.resolve_monitor(&self.card)?;
        self.max_temperature(&monitor)
    }

    fn read_fan_percent(&self) -> Option<f64> {
        let monitor = self.store.resolve_monitor(&self.card)?;
        let reading = self.fan_reading(&monitor)?;
        log::debug!("GPU[{}]: fan speed {:.1}%", self.card, reading.percent);
        Some(reading.percent)
    }

    fn read_fan_max(&self) -> Option<u32> {
        let monitor = self.store.resolve_monitor(&self.card)?;
        self.read_monitor_u32(&monitor, "pwm1_max")
    }

    fn sample(&self) -> GpuSample {
        // One monitor resolution covers every read of the cycle, so a
        // hot-unplug between reads cannot mix two devices' values.
        let Some(monitor) = self.store.resolve_monitor(&self.card) else {
            log::warn!("GPU[{}]: no corresponding hardware monitor found", self.card);
            return GpuSample::default();
        };
        GpuSample {
            temperature: self.max_temperature(&monitor),
            fan: self.fan_reading(&monitor),
        }
    }

    fn apply_fan_percent(
        &mut self,
        percent: FanPercent,
        max: Option<u32>,
    ) -> Result<(), FanControlError> {
        if !self.dpm_available() {
            log::warn!("GPU[{}]: DPM is not available", self.card);
            return Err(FanControlError::Unsupported(self.card.clone()));
        }

        let max = match max {
            Some(max) => max,
            None => self
                .read_fan_max()
                .ok_or_else(|| FanControlError::MaxUnknown(self.card.clone()))?,
        };

        // The hardware ignores duty writes while its automatic
        // controller owns the fan, so confirm manual mode first.
        let mode = self.store.read(&self.card, "fanmode");
        if mode.as_deref() != Some(FanMode::Manual.as_sysfs()) {
            self.store
                .write(&self.card, "fanmode", FanMode::Manual.as_sysfs())?;
            log::debug!("GPU[{}]: fan control set to manual", self.card);
        }

        let native = percent.to_native(max);
        log::debug!("GPU[{}]: setting fan speed to {}", self.card, percent);
        self.store.write(&self.card, "fan", &native.to_string())?;
        Ok(())
    }

    fn set_fan_mode(&mut self, mode: FanMode) -> Result<(), FanControlError> {
        self.store.write(&self.card, "fanmode", mode.as_sysfs())?;
        Ok(())
    }
}

/// Parse the numeric index out of a `card<N>` name
pub fn parse_card_index(card: &str) -> Option<u32> {
    let digits = card.strip_prefix("card")?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
