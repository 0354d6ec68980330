//! Sysfs abstraction layer
//!
//! The catalogue maps keys to control-file paths; the store performs
//! failure-classified reads and writes over them.

pub mod catalog;
pub mod store;

pub use catalog::{Catalog, CatalogEntry, Category, FW_BLOCKS};
pub use store::{SysfsPrefixes, SysfsStore};
