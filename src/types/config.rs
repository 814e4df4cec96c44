//! Configuration for memoized wrappers.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::errors::{ConfigError, ConfigResult};

/// Settings applied to one memoized wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoConfig {
    /// Label used in log fields.
    #[serde(default = "default_name")]
    pub name: String,

    /// Cache size at which a single warning is logged.
    ///
    /// The cache never evicts, so a wrapper with high key cardinality grows
    /// for as long as it lives.
    #[serde(default)]
    pub growth_warning_threshold: Option<usize>,

    /// Log cache hits at debug level instead of trace.
    #[serde(default)]
    pub log_hits: bool,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn default_name() -> String {
    "memoized".to_string()
}

impl MemoConfig {
    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            name: default_name(),
            growth_warning_threshold: None,
            log_hits: false,
        }
    }

    /// Creates default configuration with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default_config()
        }
    }

    /// Sets the growth warning threshold.
    pub fn with_growth_warning(mut self, threshold: usize) -> Self {
        self.growth_warning_threshold = Some(threshold);
        self
    }

    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MemoConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Checks values that deserialize fine but make no sense.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("name must not be empty"));
        }
        if self.growth_warning_threshold == Some(0) {
            return Err(ConfigError::invalid(
                "growth_warning_threshold must be greater than zero",
            ));
        }
        Ok(())
    }
}
