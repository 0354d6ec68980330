//! Business logic services

pub mod monitor;

pub use monitor::{Monitor, MonitorConfig};
