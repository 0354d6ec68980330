//! amdfanctl - sysfs-based AMD GPU fan control library
//!
//! This library provides the core functionality for keeping AMD GPUs
//! inside a safe thermal envelope: a hysteresis-aware fan ramping
//! policy driven by temperature trends, over a failure-classified sysfs
//! device abstraction.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation, including the fan policy
//! - [`error`]: Error types
//! - [`gpu`]: Device abstraction layer
//! - [`services`]: The control loop
//! - [`sysfs`]: Path catalogue and control-file store

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod gpu;
pub mod services;
pub mod sysfs;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
