//! Safe read/write wrapper over kernel-exposed control files
//!
//! Resolves `(card, key)` pairs to concrete paths through the catalogue,
//! reads as `Option` (failures are logged, never raised) and writes as
//! `Result` so the caller decides whether to retry.

use crate::error::SysfsWriteError;
use crate::sysfs::catalog::{Catalog, Category};

use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem roots for each control-file category
///
/// Overridable so tests can point the store at a tempfile-backed fake
/// sysfs tree.
#[derive(Debug, Clone)]
pub struct SysfsPrefixes {
    pub drm: PathBuf,
    pub hwmon: PathBuf,
    pub debug: PathBuf,
    pub module: PathBuf,
}

impl Default for SysfsPrefixes {
    fn default() -> Self {
        Self {
            drm: PathBuf::from("/sys/class/drm"),
            hwmon: PathBuf::from("/sys/class/hwmon"),
            debug: PathBuf::from("/sys/kernel/debug/dri"),
            module: PathBuf::from("/sys/module"),
        }
    }
}

/// Hwmon driver names that identify an AMD GPU monitor group
const AMD_HWMON_DRIVERS: &[&str] = &["amdgpu", "radeon"];

/// Sysfs-backed control-file store
#[derive(Debug, Clone)]
pub struct SysfsStore {
    catalog: Catalog,
    prefixes: SysfsPrefixes,
}

impl SysfsStore {
    /// Create a store over the real sysfs tree
    pub fn new(catalog: Catalog) -> Self {
        Self::with_prefixes(catalog, SysfsPrefixes::default())
    }

    /// Create a store with custom filesystem roots
    pub fn with_prefixes(catalog: Catalog, prefixes: SysfsPrefixes) -> Self {
        Self { catalog, prefixes }
    }

    /// The catalogue backing this store
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The filesystem roots backing this store
    pub fn prefixes(&self) -> &SysfsPrefixes {
        &self.prefixes
    }

    /// Read the value for `(card, key)`
    ///
    /// Any failure — unknown key, unresolvable path, missing file, I/O
    /// error — is logged and yields `None`.
    pub fn read(&self, card: &str, key: &str) -> Option<String> {
        let path = self.resolve(card, key)?;
        self.read_file(card, &path)
    }

    /// Write `value` to the control file for `(card, key)`
    ///
    /// Appends exactly one trailing newline, as sysfs files require.
    /// No retry loop here: the caller recomputes and retries next cycle.
    pub fn write(&self, card: &str, key: &str, value: &str) -> Result<(), SysfsWriteError> {
        let path = self
            .resolve_path(card, key)
            .ok_or_else(|| SysfsWriteError::PathNotFound(PathBuf::from(key)))?;
        if !path.is_file() {
            return Err(SysfsWriteError::PathNotFound(path));
        }
        log::debug!("writing {:?} to {}", value, path.display());
        fs::write(&path, format!("{}\n", value)).map_err(|source| SysfsWriteError::Io {
            path,
            source,
        })
    }

    /// Resolve `(card, key)` to an existing control file
    pub fn resolve(&self, card: &str, key: &str) -> Option<PathBuf> {
        let path = self.resolve_path(card, key)?;
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }

    /// Resolve `(card, key)` to its path without checking existence
    fn resolve_path(&self, card: &str, key: &str) -> Option<PathBuf> {
        let Some(entry) = self.catalog.get(key) else {
            log::warn!("key {} not present in catalogue", key);
            return None;
        };

        match entry.category {
            Category::Card => Some(
                self.prefixes
                    .drm
                    .join(card)
                    .join("device")
                    .join(&entry.rel_path),
            ),
            Category::Monitor => {
                let Some(monitor) = self.resolve_monitor(card) else {
                    log::warn!("GPU[{}]: no corresponding hardware monitor found", card);
                    return None;
                };
                Some(monitor.join(&entry.rel_path))
            }
            Category::Debug => {
                // Debugfs is keyed by the numeric card index.
                let index = card.strip_prefix("card")?;
                Some(self.prefixes.debug.join(index).join(&entry.rel_path))
            }
            Category::Module => Some(self.prefixes.module.join(&entry.rel_path)),
        }
    }

    /// Find the hwmon group belonging to `card`
    ///
    /// Matches by underlying device identity: both the card and its
    /// monitor expose a `device` link to the same PCI device, and
    /// canonicalized links must agree. Hwmon numbering is not stable
    /// across boots or hot-unplug, so index correspondence is never
    /// assumed.
    pub fn resolve_monitor(&self, card: &str) -> Option<PathBuf> {
        let card_device = fs::canonicalize(self.prefixes.drm.join(card).join("device")).ok()?;
        self.amd_monitors()
            .into_iter()
            .find(|monitor| match fs::canonicalize(monitor.join("device")) {
                Ok(device) => device == card_device,
                Err(_) => false,
            })
    }

    /// Read a file under an already-resolved monitor directory
    ///
    /// Used by per-tick snapshots so one monitor resolution covers all
    /// reads of a cycle.
    pub fn read_monitor_file(&self, monitor: &Path, file: &str) -> Option<String> {
        let path = monitor.join(file);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value.trim_end().to_string()),
            Err(e) => {
                log::debug!("unable to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// All hwmon groups driven by an AMD GPU driver
    fn amd_monitors(&self) -> Vec<PathBuf> {
        let Ok(dir) = fs::read_dir(&self.prefixes.hwmon) else {
            return Vec::new();
        };
        dir.flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                fs::read_to_string(path.join("name"))
                    .map(|name| AMD_HWMON_DRIVERS.contains(&name.trim_end()))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn read_file(&self, card: &str, path: &Path) -> Option<String> {
        // Some files like power1_average return -EINVAL instead of a
        // value, so any read error degrades to absent.
        match fs::read_to_string(path) {
            Ok(value) => Some(value.trim_end().to_string()),
            Err(e) => {
                log::warn!("GPU[{}]: unable to read {}: {}", card, path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    /// Build a fake sysfs tree with two cards whose hwmon numbering is
    /// deliberately swapped relative to the card numbering.
    fn fake_sysfs() -> (TempDir, SysfsStore) {
        let root = TempDir::new().unwrap();
        let base = root.path();

        for (card, pci) in [("card0", "0000:03:00.0"), ("card1", "0000:0b:00.0")] {
            fs::create_dir_all(base.join("pci").join(pci)).unwrap();
            fs::create_dir_all(base.join("drm").join(card)).unwrap();
            symlink(
                base.join("pci").join(pci),
                base.join("drm").join(card).join("device"),
            )
            .unwrap();
        }

        // hwmon0 belongs to card1, hwmon1 to card0.
        for (mon, pci) in [("hwmon0", "0000:0b:00.0"), ("hwmon1", "0000:03:00.0")] {
            let dir = base.join("hwmon").join(mon);
            fs::create_dir_all(&dir).unwrap();
            write_file(&dir.join("name"), "amdgpu\n");
            symlink(base.join("pci").join(pci), dir.join("device")).unwrap();
        }

        fs::create_dir_all(base.join("module/amdgpu")).unwrap();

        let prefixes = SysfsPrefixes {
            drm: base.join("drm"),
            hwmon: base.join("hwmon"),
            debug: base.join("debug"),
            module: base.join("module"),
        };
        let store = SysfsStore::with_prefixes(Catalog::amdgpu(), prefixes);
        (root, store)
    }

    fn write_file(path: &Path, content: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_read_card_file() {
        let (root, store) = fake_sysfs();
        write_file(
            &root.path().join("pci/0000:03:00.0/vendor"),
            "0x1002\n",
        );

        assert_eq!(store.read("card0", "vendor").as_deref(), Some("0x1002"));
    }

    #[test]
    fn test_read_missing_file_is_absent() {
        let (_root, store) = fake_sysfs();
        assert!(store.read("card0", "vendor").is_none());
    }

    #[test]
    fn test_read_unknown_key_is_absent() {
        let (_root, store) = fake_sysfs();
        assert!(store.read("card0", "bogus").is_none());
    }

    #[test]
    fn test_monitor_matched_by_identity_not_index() {
        let (root, store) = fake_sysfs();
        // temp1 goes into card0's monitor, which is hwmon1.
        write_file(
            &root.path().join("hwmon/hwmon1/temp1_input"),
            "61000\n",
        );

        let monitor = store.resolve_monitor("card0").unwrap();
        assert!(monitor.ends_with("hwmon1"));
        assert_eq!(store.read("card0", "temp1").as_deref(), Some("61000"));
        assert!(store.read("card1", "temp1").is_none());
    }

    #[test]
    fn test_non_amd_monitor_ignored() {
        let (root, store) = fake_sysfs();
        let dir = root.path().join("hwmon/hwmon2");
        fs::create_dir_all(&dir).unwrap();
        write_file(&dir.join("name"), "nvme\n");
        write_file(&dir.join("temp1_input"), "30000\n");
        symlink(root.path().join("pci/0000:03:00.0"), dir.join("device")).unwrap();

        // card0 still resolves to hwmon1, the amdgpu one.
        let monitor = store.resolve_monitor("card0").unwrap();
        assert!(monitor.ends_with("hwmon1"));
    }

    #[test]
    fn test_read_module_file() {
        let (root, store) = fake_sysfs();
        write_file(&root.path().join("module/amdgpu/version"), "5.18.2\n");
        assert_eq!(store.read("card0", "driver").as_deref(), Some("5.18.2"));
    }

    #[test]
    fn test_write_appends_newline() {
        let (root, store) = fake_sysfs();
        let fan = root.path().join("hwmon/hwmon1/pwm1");
        write_file(&fan, "0\n");

        store.write("card0", "fan", "128").unwrap();
        assert_eq!(fs::read_to_string(&fan).unwrap(), "128\n");
    }

    #[test]
    fn test_write_missing_file_fails() {
        let (_root, store) = fake_sysfs();
        let err = store.write("card0", "fan", "128").unwrap_err();
        assert!(matches!(err, SysfsWriteError::PathNotFound(_)));
    }

    #[test]
    fn test_read_monitor_file() {
        let (root, store) = fake_sysfs();
        write_file(&root.path().join("hwmon/hwmon1/pwm1_max"), "255\n");

        let monitor = store.resolve_monitor("card0").unwrap();
        assert_eq!(
            store.read_monitor_file(&monitor, "pwm1_max").as_deref(),
            Some("255")
        );
        assert!(store.read_monitor_file(&monitor, "pwm1").is_none());
    }
}
