//! GPU abstraction layer
//!
//! Traits for device access plus the sysfs-backed implementations.

pub mod device;
pub mod registry;
pub mod traits;

pub use device::CardDevice;
pub use registry::{CardRegistry, AMD_VENDOR_ID};
pub use traits::{FanReading, GpuDevice, GpuManager, GpuSample};
