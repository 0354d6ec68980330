//! Sysfs path catalogue
//!
//! Maps telemetry/control keys to the category and relative path of the
//! kernel file that backs them. The catalogue is a pure path table,
//! read-only after construction; value parsing for display lives with
//! the telemetry command.

use std::collections::HashMap;

/// Where a control file lives relative to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Under the card's own hierarchy: `<drm>/<card>/device/<path>`
    Card,
    /// Under the card's matched hwmon group: `<hwmon>/hwmonN/<path>`
    Monitor,
    /// Under debugfs by card index: `<debug>/<N>/<path>`
    Debug,
    /// Global kernel-module file: `<module>/<path>`
    Module,
}

/// One catalogue entry: category plus path relative to the category root
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub category: Category,
    pub rel_path: String,
}

/// Key → control-file lookup table
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

/// Firmware blocks exposing a `fw_version/<block>_fw_version` file
pub const FW_BLOCKS: &[&str] = &[
    "vce", "uvd", "mc", "me", "pfp", "ce", "rlc", "rlc_srlc", "rlc_srlg", "rlc_srls", "mec",
    "mec2", "sos", "asd", "ta_ras", "ta_xgmi", "smc", "sdma", "sdma2", "vcn", "dmcu",
];

const CARD_ENTRIES: &[(&str, &str)] = &[
    ("id", "device"),
    ("sub_id", "subsystem_device"),
    ("vbios", "vbios_version"),
    ("perf", "power_dpm_force_performance_level"),
    ("sclk_od", "pp_sclk_od"),
    ("mclk_od", "pp_mclk_od"),
    ("dcefclk", "pp_dpm_dcefclk"),
    ("fclk", "pp_dpm_fclk"),
    ("mclk", "pp_dpm_mclk"),
    ("pcie", "pp_dpm_pcie"),
    ("sclk", "pp_dpm_sclk"),
    ("socclk", "pp_dpm_socclk"),
    ("clk_voltage", "pp_od_clk_voltage"),
    ("profile", "pp_power_profile_mode"),
    ("use", "gpu_busy_percent"),
    ("use_mem", "mem_busy_percent"),
    ("pcie_bw", "pcie_bw"),
    ("replay_count", "pcie_replay_count"),
    ("unique_id", "unique_id"),
    ("serial", "serial_number"),
    ("vendor", "vendor"),
    ("sub_vendor", "subsystem_vendor"),
    ("dpm_state", "power_dpm_state"),
    ("vram_used", "mem_info_vram_used"),
    ("vram_total", "mem_info_vram_total"),
    ("vis_vram_used", "mem_info_vis_vram_used"),
    ("vis_vram_total", "mem_info_vis_vram_total"),
    ("vram_vendor", "mem_info_vram_vendor"),
    ("gtt_used", "mem_info_gtt_used"),
    ("gtt_total", "mem_info_gtt_total"),
    ("ras_gfx", "ras/gfx_err_count"),
    ("ras_sdma", "ras/sdma_err_count"),
    ("ras_umc", "ras/umc_err_count"),
    ("ras_mmhub", "ras/mmhub_err_count"),
    ("ras_athub", "ras/athub_err_count"),
    ("ras_pcie_bif", "ras/pcie_bif_err_count"),
    ("ras_hdp", "ras/hdp_err_count"),
    ("ras_xgmi_wafl", "ras/xgmi_wafl_err_count"),
    ("ras_df", "ras/df_err_count"),
    ("ras_smn", "ras/smn_err_count"),
    ("ras_sem", "ras/sem_err_count"),
    ("ras_mp0", "ras/mp0_err_count"),
    ("ras_mp1", "ras/mp1_err_count"),
    ("ras_fuse", "ras/fuse_err_count"),
    ("xgmi_err", "xgmi_error"),
    ("ras_features", "ras/features"),
    ("bad_pages", "ras/gpu_vram_bad_pages"),
];

const MONITOR_ENTRIES: &[(&str, &str)] = &[
    ("voltage", "in0_input"),
    ("fan", "pwm1"),
    ("fanmax", "pwm1_max"),
    ("fanmode", "pwm1_enable"),
    ("temp1", "temp1_input"),
    ("temp1_label", "temp1_label"),
    ("temp2", "temp2_input"),
    ("temp2_label", "temp2_label"),
    ("temp3", "temp3_input"),
    ("temp3_label", "temp3_label"),
    ("power", "power1_average"),
    ("power_cap", "power1_cap"),
    ("power_cap_max", "power1_cap_max"),
    ("power_cap_min", "power1_cap_min"),
];

const DEBUG_ENTRIES: &[(&str, &str)] = &[
    ("ras_ctrl", "ras/ras_ctrl"),
    ("gpu_reset", "amdgpu_gpu_recover"),
];

const MODULE_ENTRIES: &[(&str, &str)] = &[("driver", "amdgpu/version")];

impl Catalog {
    /// Build the full amdgpu catalogue
    pub fn amdgpu() -> Self {
        let mut entries = HashMap::new();

        let groups = [
            (Category::Card, CARD_ENTRIES),
            (Category::Monitor, MONITOR_ENTRIES),
            (Category::Debug, DEBUG_ENTRIES),
            (Category::Module, MODULE_ENTRIES),
        ];
        for (category, group) in groups {
            for (key, rel_path) in group {
                entries.insert(
                    (*key).to_string(),
                    CatalogEntry {
                        category,
                        rel_path: (*rel_path).to_string(),
                    },
                );
            }
        }

        for block in FW_BLOCKS {
            entries.insert(
                format!("{}_fw_version", block),
                CatalogEntry {
                    category: Category::Card,
                    rel_path: format!("fw_version/{}_fw_version", block),
                },
            );
        }

        Self { entries }
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    /// Whether the catalogue knows this key
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All known keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::amdgpu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_fan_keys() {
        let catalog = Catalog::amdgpu();
        let fan = catalog.get("fan").unwrap();
        assert_eq!(fan.category, Category::Monitor);
        assert_eq!(fan.rel_path, "pwm1");

        let mode = catalog.get("fanmode").unwrap();
        assert_eq!(mode.rel_path, "pwm1_enable");
    }

    #[test]
    fn test_catalog_categories() {
        let catalog = Catalog::amdgpu();
        assert_eq!(catalog.get("vendor").unwrap().category, Category::Card);
        assert_eq!(catalog.get("temp1").unwrap().category, Category::Monitor);
        assert_eq!(catalog.get("ras_ctrl").unwrap().category, Category::Debug);
        assert_eq!(catalog.get("driver").unwrap().category, Category::Module);
    }

    #[test]
    fn test_catalog_firmware_blocks() {
        let catalog = Catalog::amdgpu();
        for block in FW_BLOCKS {
            let key = format!("{}_fw_version", block);
            let entry = catalog.get(&key).unwrap();
            assert_eq!(entry.category, Category::Card);
            assert!(entry.rel_path.starts_with("fw_version/"));
        }
    }

    #[test]
    fn test_catalog_unknown_key() {
        let catalog = Catalog::amdgpu();
        assert!(catalog.get("nonsense").is_none());
        assert!(!catalog.contains("nonsense"));
    }

    #[test]
    fn test_catalog_keys_sorted() {
        let catalog = Catalog::amdgpu();
        let keys = catalog.keys();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert!(keys.contains(&"fan"));
    }
}
