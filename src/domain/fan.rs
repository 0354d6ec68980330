//! Fan-related domain types
//!
//! Provides the validated fan speed percentage, the manual/auto control
//! mode, and [`FanPolicy`] — the hysteresis-aware ramping policy that
//! turns a temperature trend into a bounded fan-speed delta.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fan speed percentage (0-100)
///
/// Validated on construction to ensure the value is within valid range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FanPercent(f64);

impl FanPercent {
    /// Minimum valid fan speed
    pub const MIN: f64 = 0.0;
    /// Maximum valid fan speed
    pub const MAX: f64 = 100.0;

    /// Create a new FanPercent with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidFanPercent` if the value is outside
    /// 0-100 or not finite.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::InvalidFanPercent(value));
        }
        Ok(Self(value))
    }

    /// Create a FanPercent clamped into range instead of rejected
    ///
    /// Used for values the controller derives itself, which are in
    /// range by construction up to floating-point rounding.
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Get the speed as a percentage value (0-100)
    #[inline]
    pub const fn as_percentage(&self) -> f64 {
        self.0
    }

    /// Convert to the device's native duty units
    ///
    /// Truncates toward zero on the native scale and never exceeds the
    /// device maximum.
    pub fn to_native(&self, max: u32) -> u32 {
        let raw = (self.0 * max as f64 / 100.0) as u32;
        raw.min(max)
    }
}

impl fmt::Display for FanPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl TryFrom<f64> for FanPercent {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FanPercent> for f64 {
    fn from(speed: FanPercent) -> Self {
        speed.0
    }
}

/// Fan control mode, as encoded by the hwmon `pwm1_enable` file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    /// Hardware controls fan speed automatically
    #[default]
    Auto,
    /// Manual fan speed control
    Manual,
}

impl FanMode {
    /// The value written to `pwm1_enable` for this mode
    pub const fn as_sysfs(&self) -> &'static str {
        match self {
            FanMode::Auto => "2",
            FanMode::Manual => "1",
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanMode::Auto => write!(f, "Auto"),
            FanMode::Manual => write!(f, "Manual"),
        }
    }
}

/// Hysteresis-aware fan ramping policy
///
/// A pure function of `(temperature, temperature trend, current fan
/// speed)` producing the fan-speed delta for this tick. Speeds below
/// `min_speed` are a dead zone: too slow to move air, loud enough to
/// hear the motor hunt. The policy never parks a fan inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanPolicy {
    /// Below this percentage the fan is considered ineffective
    pub min_speed: f64,
    /// At or below this temperature the fan may wind down to off
    pub cold: f64,
    /// At or above this temperature the fan is forced to 100%
    pub hot: f64,
    /// Percentage changed per tick when ramping gradually
    pub step: f64,
}

impl Default for FanPolicy {
    fn default() -> Self {
        Self {
            min_speed: 18.0,
            cold: 50.0,
            hot: 75.0,
            step: 1.0,
        }
    }
}

impl FanPolicy {
    /// Create a policy with validation
    ///
    /// # Errors
    /// Returns a `DomainError` if `cold >= hot`, `step <= 0`, or
    /// `min_speed` is outside 0-100.
    pub fn new(min_speed: f64, cold: f64, hot: f64, step: f64) -> Result<Self, DomainError> {
        if !(FanPercent::MIN..=FanPercent::MAX).contains(&min_speed) {
            return Err(DomainError::InvalidFanPercent(min_speed));
        }
        if cold >= hot {
            return Err(DomainError::InvalidThresholds { cold, hot });
        }
        if step <= 0.0 {
            return Err(DomainError::InvalidStep(step));
        }
        Ok(Self {
            min_speed,
            cold,
            hot,
            step,
        })
    }

    /// Compute the fan-speed delta for one control tick
    ///
    /// `trend` is degrees Celsius per second, measured between the last
    /// two polls. The returned delta, added to `fan_speed`, always lands
    /// in 0-100.
    pub fn delta(&self, temperature: f64, trend: f64, fan_speed: f64) -> f64 {
        if temperature >= self.hot {
            // Safety ceiling: jump straight to 100%, not a gradual ramp.
            return self.increase_delta(fan_speed, 100.0);
        }

        if temperature <= self.cold {
            if trend < 0.0 {
                return self.decrease_delta(fan_speed, self.step, true);
            }
            // Flat or rising but still cold: hold, to avoid chattering
            // right at the cold boundary.
            return 0.0;
        }

        if trend < 0.0 {
            // Between cold and hot the fan may coast at the floor but
            // not switch off.
            return self.decrease_delta(fan_speed, self.step, false);
        }
        if trend > 0.0 {
            return self.increase_delta(fan_speed, self.step);
        }
        0.0
    }

    /// Bounded increase: cap at 100%, and never land inside the dead
    /// zone between off and `min_speed`
    fn increase_delta(&self, fan_speed: f64, step: f64) -> f64 {
        let target = fan_speed + step;
        if target > 100.0 {
            return 100.0 - fan_speed;
        }
        if target < self.min_speed {
            return self.min_speed - fan_speed;
        }
        step
    }

    /// Bounded decrease with floor semantics
    ///
    /// Running below the floor is never a stable state, so a fan found
    /// there snaps to off regardless of `turn_off`. A decrease that
    /// would cross the floor either turns off or holds exactly at the
    /// floor, depending on `turn_off`.
    fn decrease_delta(&self, fan_speed: f64, step: f64, turn_off: bool) -> f64 {
        if fan_speed < self.min_speed {
            return -fan_speed;
        }
        if fan_speed - step < self.min_speed {
            if turn_off {
                return -fan_speed;
            }
            return -fan_speed + self.min_speed;
        }
        -step
    }
}
