//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    pub fn with_file(mut self, path: Option<&str>) -> Self {
        let file_config = if let Some(path) = path {
            ConfigFile::load(path).ok()
        } else {
            ConfigFile::load_default()
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        if dry_run {
            self.config.general.dry_run = true;
        }
        self
    }

    /// Override with CLI interval
    pub fn with_interval(mut self, interval: Option<u64>) -> Self {
        if let Some(i) = interval {
            self.config.general.interval_seconds = i;
        }
        self
    }

    /// Override with CLI minimum fan speed
    pub fn with_min_speed(mut self, min_speed: Option<f64>) -> Self {
        if let Some(m) = min_speed {
            self.config.fan.min_speed = m;
        }
        self
    }

    /// Override with CLI cold threshold
    pub fn with_cold(mut self, cold: Option<f64>) -> Self {
        if let Some(c) = cold {
            self.config.fan.cold = c;
        }
        self
    }

    /// Override with CLI hot threshold
    pub fn with_hot(mut self, hot: Option<f64>) -> Self {
        if let Some(h) = hot {
            self.config.fan.hot = h;
        }
        self
    }

    /// Override with CLI ramp step
    pub fn with_step(mut self, step: Option<f64>) -> Self {
        if let Some(s) = step {
            self.config.fan.step = s;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
