//! Device enumeration
//!
//! Scans the DRM class hierarchy for AMD cards.

use crate::error::RegistryError;
use crate::gpu::device::{parse_card_index, CardDevice};
use crate::gpu::traits::{GpuDevice, GpuManager};
use crate::sysfs::SysfsStore;

use std::fs;
use std::sync::Arc;

/// PCI vendor ID identifying AMD devices
pub const AMD_VENDOR_ID: &str = "0x1002";

/// Enumerates AMD cards from the DRM class directory
#[derive(Debug, Clone)]
pub struct CardRegistry {
    store: Arc<SysfsStore>,
}

impl CardRegistry {
    /// Create a registry over the given store
    pub fn new(store: Arc<SysfsStore>) -> Self {
        Self { store }
    }

    /// The store backing this registry
    pub fn store(&self) -> &Arc<SysfsStore> {
        &self.store
    }

    fn is_amd(&self, card: &str) -> bool {
        self.store.read(card, "vendor").as_deref() == Some(AMD_VENDOR_ID)
    }
}

impl GpuManager for CardRegistry {
    type Device = CardDevice;

    /// Enumerate `card<N>` entries with the AMD vendor ID, ascending
    ///
    /// A missing or empty DRM class directory is an environment
    /// problem, not a crash: the error is reported and the caller runs
    /// with an empty device set.
    fn list_devices(&self) -> Result<Vec<CardDevice>, RegistryError> {
        let drm = &self.store.prefixes().drm;
        let entries = fs::read_dir(drm)
            .map_err(|_| RegistryError::ClassMissing(drm.clone()))?
            .flatten()
            .collect::<Vec<_>>();
        if entries.is_empty() {
            return Err(RegistryError::ClassMissing(drm.clone()));
        }

        let mut devices: Vec<CardDevice> = entries
            .iter()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| parse_card_index(name).is_some())
            .filter(|name| self.is_amd(name))
            .filter_map(|name| CardDevice::new(&name, Arc::clone(&self.store)))
            .collect();
        devices.sort_by_key(|device| device.index());
        Ok(devices)
    }
}
