//! Thermal domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Temperature(f64);

impl Temperature {
    /// Create a new Temperature
    pub const fn new(celsius: f64) -> Self {
        Self(celsius)
    }

    /// Convert from the integer millidegree encoding used by hwmon files
    pub fn from_millidegrees(millidegrees: i64) -> Self {
        Self(millidegrees as f64 / 1000.0)
    }

    /// Get the temperature in Celsius
    #[inline]
    pub const fn as_celsius(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millidegrees() {
        let temp = Temperature::from_millidegrees(54_500);
        assert!((temp.as_celsius() - 54.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_temperature_display() {
        assert_eq!(Temperature::new(55.0).to_string(), "55°C");
    }

    #[test]
    fn test_temperature_ordering() {
        assert!(Temperature::new(40.0) < Temperature::new(75.0));
    }
}
