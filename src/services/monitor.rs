//! Control loop monitor
//!
//! Orchestrates periodic polling across all devices, tracks per-device
//! state between ticks, and applies the fan policy's deltas.

use crate::domain::{FanPercent, FanPolicy, Temperature};
use crate::gpu::{GpuDevice, GpuManager};

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval between control ticks
    pub interval: Duration,
    /// Print a status line every Nth tick; 0 disables status lines
    pub status_every: u64,
    /// Whether to exit after one tick
    pub single_use: bool,
    /// Dry run mode: compute deltas but never write
    pub dry_run: bool,
    /// The fan ramping policy
    pub policy: FanPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            status_every: 5,
            single_use: false,
            dry_run: false,
            policy: FanPolicy::default(),
        }
    }
}

/// Per-device trend state, owned exclusively by the monitor
///
/// Seeded on the first successful temperature read, updated every tick
/// the temperature is readable, and discarded when the device drops out
/// of enumeration.
#[derive(Debug, Clone, Copy)]
struct ControlState {
    last_temperature: Temperature,
    last_poll: Instant,
}

/// Control loop monitor
pub struct Monitor<M: GpuManager> {
    manager: M,
    config: MonitorConfig,
    states: HashMap<String, ControlState>,
    /// Cards whose actuator is permanently unavailable (no DPM)
    unsupported: HashSet<String>,
    ticks: u64,
    enumeration_failed: bool,
}

impl<M: GpuManager> Monitor<M> {
    /// Create a new monitor with the given configuration
    pub fn new(manager: M, config: MonitorConfig) -> Self {
        Self {
            manager,
            config,
            states: HashMap::new(),
            unsupported: HashSet::new(),
            ticks: 0,
            enumeration_failed: false,
        }
    }

    /// Get the monitor configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run the control loop until terminated
    pub fn run(&mut self) {
        log::info!(
            "starting control loop: interval {:?}, policy {:?}",
            self.config.interval,
            self.config.policy
        );
        loop {
            self.tick();
            if self.config.single_use {
                log::info!("single-use mode: exiting after one tick");
                break;
            }
            std::thread::sleep(self.config.interval);
        }
    }

    /// Execute one control tick across all devices
    ///
    /// Public and side-effect complete so tests can drive the loop
    /// without sleeping.
    pub fn tick(&mut self) {
        let devices = match self.manager.list_devices() {
            Ok(devices) => {
                self.enumeration_failed = false;
                devices
            }
            Err(e) => {
                // Report once, then idle: an absent DRM class is an
                // environment problem, not a reason to terminate.
                if !self.enumeration_failed {
                    log::error!("unable to enumerate devices: {}", e);
                    self.enumeration_failed = true;
                }
                Vec::new()
            }
        };

        // Devices that vanished take their trend state with them; a
        // rediscovered card starts over from Uninitialized.
        self.states
            .retain(|card, _| devices.iter().any(|device| device.card() == card));

        let status_due =
            self.config.status_every != 0 && self.ticks % self.config.status_every == 0;
        for mut device in devices {
            self.poll_device(&mut device, status_due);
        }
        self.ticks += 1;
    }

    fn poll_device(&mut self, device: &mut M::Device, status_due: bool) {
        let card = device.card().to_string();
        let sample = device.sample();

        let Some(temperature) = sample.temperature else {
            // Without a fresh temperature there is nothing to decide,
            // and updating last_poll alone would produce a spurious
            // trend against a stale timestamp gap next tick.
            log::debug!("GPU[{}]: temperature unavailable, skipping cycle", card);
            return;
        };

        if status_due {
            print_status(&card, temperature, sample.fan.map(|fan| fan.percent));
        }

        let now = Instant::now();
        let trend = match self.states.get_mut(&card) {
            Some(state) => {
                let elapsed = now.duration_since(state.last_poll).as_secs_f64();
                let trend = if elapsed > 0.0 {
                    (temperature.as_celsius() - state.last_temperature.as_celsius()) / elapsed
                } else {
                    0.0
                };
                state.last_temperature = temperature;
                state.last_poll = now;
                trend
            }
            None => {
                // First successful read seeds the trend state; no
                // control action until a trend exists.
                self.states.insert(
                    card,
                    ControlState {
                        last_temperature: temperature,
                        last_poll: now,
                    },
                );
                return;
            }
        };

        let Some(fan) = sample.fan else {
            // Temperature state still advances; only actuation is
            // skipped this cycle.
            log::debug!("GPU[{}]: fan reading unavailable, skipping cycle", card);
            return;
        };

        if self.unsupported.contains(&card) {
            return;
        }

        let delta = self
            .config
            .policy
            .delta(temperature.as_celsius(), trend, fan.percent);
        log::debug!(
            "device={}, temp={}, temp_delta={:.3}, fan_speed={:.1}%, delta={:.1}",
            card,
            temperature,
            trend,
            fan.percent,
            delta
        );
        if delta == 0.0 {
            return;
        }

        let target = FanPercent::clamped(fan.percent + delta);
        if self.config.dry_run {
            log::info!("[DRY RUN] would set {} fan speed to {}", card, target);
            return;
        }
        if let Err(e) = device.apply_fan_percent(target, Some(fan.max)) {
            if e.is_permanent() {
                log::warn!("GPU[{}]: fan control unsupported, giving up: {}", card, e);
                self.unsupported.insert(card);
            } else {
                // The next tick recomputes from unchanged state, which
                // is the retry.
                log::warn!("GPU[{}]: failed to set fan speed: {}", card, e);
            }
        }
    }
}

fn print_status(card: &str, temperature: Temperature, fan_percent: Option<f64>) {
    let fan = match fan_percent {
        Some(percent) => format!("{:.1}%", percent),
        None => "unknown".to_string(),
    };
    println!(
        "{} || device {} || temperature: {} || fan speed: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        card,
        temperature,
        fan
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockManager};

    fn monitor(manager: MockManager) -> Monitor<MockManager> {
        Monitor::new(manager, MonitorConfig::default())
    }

    #[test]
    fn test_monitor_config_default() {
        let config = MonitorConfig::default();
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(config.status_every, 5);
        assert!(!config.single_use);
    }

    #[test]
    fn test_first_tick_seeds_without_acting() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_rising_temperature_steps_fan_up() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        device.set_fan(50.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        device.set_temperature(61.0);
        monitor.tick();

        assert_eq!(device.applied(), vec![51.0]);
    }

    #[test]
    fn test_hot_temperature_jumps_to_full() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        device.set_fan(40.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        device.set_temperature(80.0);
        monitor.tick();

        assert_eq!(device.applied(), vec![100.0]);
    }

    #[test]
    fn test_flat_temperature_holds() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        monitor.tick();
        monitor.tick();

        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_unreadable_temperature_skips_cycle() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        device.clear_temperature();
        monitor.tick();
        // Recovery: rising again relative to the last good reading.
        device.set_temperature(61.0);
        monitor.tick();

        assert_eq!(device.applied(), vec![51.0]);
    }

    #[test]
    fn test_unreadable_fan_still_advances_temperature_state() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        device.set_temperature(65.0);
        device.clear_fan();
        monitor.tick();
        assert!(device.applied().is_empty());

        // Fan comes back while temperature is flat at 65: no action,
        // proving last_temperature advanced during the degraded tick.
        device.set_fan(50.0);
        monitor.tick();
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_dropped_device_state_is_pruned() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        let manager = MockManager::with_devices(vec![device.clone()]);
        let mut monitor = monitor(manager);

        monitor.tick();
        monitor.manager.remove_device("card0");
        monitor.tick();
        assert!(monitor.states.is_empty());

        // Rediscovered: seeds again, no action on the first tick back.
        monitor.manager.add_device(device.clone());
        device.set_temperature(70.0);
        monitor.tick();
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_unsupported_device_is_skipped_permanently() {
        let device = MockDevice::without_dpm(0);
        device.set_temperature(60.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        device.set_temperature(61.0);
        monitor.tick();
        assert!(monitor.unsupported.contains("card0"));

        device.set_temperature(62.0);
        monitor.tick();
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_write_failure_is_retried_next_tick() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        device.set_fan(50.0);
        let mut monitor = monitor(MockManager::with_devices(vec![device.clone()]));

        monitor.tick();
        device.set_temperature(61.0);
        device.set_fail_writes(true);
        monitor.tick();
        assert!(device.applied().is_empty());
        assert!(!monitor.unsupported.contains("card0"));

        device.set_temperature(62.0);
        device.set_fail_writes(false);
        monitor.tick();
        assert_eq!(device.applied(), vec![51.0]);
    }

    #[test]
    fn test_status_every_zero_disables_status_lines() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        let manager = MockManager::with_devices(vec![device.clone()]);
        let config = MonitorConfig {
            status_every: 0,
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::new(manager, config);

        // Ticks normally instead of dividing by zero; control still runs.
        monitor.tick();
        device.set_temperature(61.0);
        monitor.tick();
        assert_eq!(device.applied(), vec![51.0]);
    }

    #[test]
    fn test_dry_run_never_writes() {
        let device = MockDevice::new(0);
        device.set_temperature(60.0);
        let manager = MockManager::with_devices(vec![device.clone()]);
        let config = MonitorConfig {
            dry_run: true,
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::new(manager, config);

        monitor.tick();
        device.set_temperature(80.0);
        monitor.tick();

        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_enumeration_failure_idles() {
        let manager = MockManager::new();
        manager.set_fail_enumeration(true);
        let mut monitor = monitor(manager);

        monitor.tick();
        monitor.tick();
        assert!(monitor.states.is_empty());
    }
}
