//! Domain models for amdfanctl
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod fan;
pub mod thermal;

pub use fan::{FanMode, FanPercent, FanPolicy};
pub use thermal::Temperature;
