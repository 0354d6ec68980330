//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::domain::FanPolicy;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Fan policy settings
    pub fan: FanConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Control loop interval in seconds
    pub interval_seconds: u64,
    /// Print a status line every Nth tick
    pub status_every: u64,
    /// Dry run mode
    pub dry_run: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 2,
            status_every: 5,
            dry_run: false,
        }
    }
}

/// Fan policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    /// Minimum effective fan speed percentage
    pub min_speed: f64,
    /// Temperature below which the fan may wind down to off
    pub cold: f64,
    /// Temperature at which the fan is forced to 100%
    pub hot: f64,
    /// Percentage changed per tick when ramping gradually
    pub step: f64,
}

impl Default for FanConfig {
    fn default() -> Self {
        let policy = FanPolicy::default();
        Self {
            min_speed: policy.min_speed,
            cold: policy.cold,
            hot: policy.hot,
            step: policy.step,
        }
    }
}

impl FanConfig {
    /// Convert to a validated FanPolicy domain object
    pub fn to_policy(&self) -> Result<FanPolicy, DomainError> {
        FanPolicy::new(self.min_speed, self.cold, self.hot, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.interval_seconds, 2);
        assert_eq!(config.general.status_every, 5);
        assert_eq!(config.fan.min_speed, 18.0);
    }

    #[test]
    fn test_fan_config_to_policy() {
        let policy = FanConfig::default().to_policy().unwrap();
        assert_eq!(policy, FanPolicy::default());
    }

    #[test]
    fn test_invalid_fan_config_rejected() {
        let config = FanConfig {
            cold: 80.0,
            hot: 50.0,
            ..FanConfig::default()
        };
        assert!(config.to_policy().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
            [general]
            interval_seconds = 5
            dry_run = true

            [fan]
            min_speed = 25.0
            cold = 45.0
            hot = 80.0
            step = 2.0
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.interval_seconds, 5);
        assert!(config.general.dry_run);
        assert_eq!(config.general.status_every, 5); // default preserved
        let policy = config.fan.to_policy().unwrap();
        assert_eq!(policy.step, 2.0);
    }
}
