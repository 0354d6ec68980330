//! Unified error types for amdfanctl
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.
//!
//! Sysfs reads are intentionally not represented here: an unreadable
//! telemetry or sensor file is reported as `None` by the store and
//! logged, never raised. Only writes and enumeration fail loudly.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to write a sysfs control file
    #[error("sysfs write error: {0}")]
    SysfsWrite(#[from] SysfsWriteError),

    /// Error enumerating GPU devices
    #[error("device enumeration error: {0}")]
    Registry(#[from] RegistryError),

    /// Error taking manual control of a fan
    #[error("fan control error: {0}")]
    FanControl(#[from] FanControlError),

    /// Error from configuration parsing/validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Card not found at the requested index
    #[error("no AMD card at index {0}")]
    CardNotFound(u32),

    /// Telemetry key not present in the catalogue
    #[error("unknown telemetry key: {0}")]
    UnknownKey(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from writing sysfs control files
#[derive(Error, Debug)]
pub enum SysfsWriteError {
    /// The control file does not exist for this card
    #[error("sysfs path not found: {0}")]
    PathNotFound(PathBuf),

    /// The write itself failed
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from enumerating cards under the DRM class directory
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The DRM class directory is missing or holds no cards
    #[error("no GPU class entries under {0}")]
    ClassMissing(PathBuf),
}

/// Errors from taking manual control of a card's fan
#[derive(Error, Debug)]
pub enum FanControlError {
    /// The card exposes no DPM interface; manual fan control is unavailable
    #[error("card {0} does not support manual fan control")]
    Unsupported(String),

    /// The fan's maximum native duty could not be read
    #[error("card {0}: maximum fan duty is unreadable")]
    MaxUnknown(String),

    /// Writing the mode or duty file failed
    #[error(transparent)]
    Write(#[from] SysfsWriteError),
}

impl FanControlError {
    /// Whether retrying on a later cycle can ever succeed.
    ///
    /// A card without DPM stays that way for the life of the process;
    /// unreadable maxima and failed writes are worth retrying.
    pub fn is_permanent(&self) -> bool {
        matches!(self, FanControlError::Unsupported(_))
    }
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Fan speed percentage outside 0-100
    #[error("invalid fan speed: {0}% (must be 0-100)")]
    InvalidFanPercent(f64),

    /// Policy thresholds out of order
    #[error("invalid thresholds: cold {cold}°C must be below hot {hot}°C")]
    InvalidThresholds { cold: f64, hot: f64 },

    /// Non-positive ramp step
    #[error("invalid ramp step: {0}% (must be positive)")]
    InvalidStep(f64),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::InvalidFanPercent(150.0);
        assert_eq!(err.to_string(), "invalid fan speed: 150% (must be 0-100)");
    }

    #[test]
    fn test_threshold_error_display() {
        let err = DomainError::InvalidThresholds {
            cold: 80.0,
            hot: 50.0,
        };
        assert!(err.to_string().contains("80°C"));
        assert!(err.to_string().contains("50°C"));
    }

    #[test]
    fn test_error_conversion() {
        let domain_err = DomainError::InvalidStep(0.0);
        let app_err: AppError = domain_err.into();
        assert!(matches!(app_err, AppError::Domain(_)));
    }

    #[test]
    fn test_fan_control_permanence() {
        assert!(FanControlError::Unsupported("card0".to_string()).is_permanent());
        assert!(!FanControlError::MaxUnknown("card0".to_string()).is_permanent());
        assert!(
            !FanControlError::Write(SysfsWriteError::PathNotFound(PathBuf::from("fan")))
                .is_permanent()
        );
    }

    #[test]
    fn test_write_error_display_includes_path() {
        let err = SysfsWriteError::Io {
            path: PathBuf::from("/sys/class/hwmon/hwmon0/pwm1"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("pwm1"));
    }
}
