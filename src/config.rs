//! dmn-search configuration
//!
//! Handles loading of `.dmnsearch.yaml`, looked up in a directory and then
//! in each of its ancestors.

use crate::error::{Error, Result};
use crate::replace::{PatternMode, PatternOptions, DEFAULT_SIZE_LIMIT};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file
pub const CONFIG_FILE: &str = ".dmnsearch.yaml";

/// Root configuration (`.dmnsearch.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchConfig {
    /// Schema version for migrations
    pub version: u32,

    /// Replace settings
    #[serde(default)]
    pub replace: ReplaceConfig,
}

/// Replace settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReplaceConfig {
    /// How `replace_what` is interpreted
    #[serde(default)]
    pub pattern_mode: PatternMode,

    /// Compiled pattern size limit in bytes
    #[serde(default = "default_size_limit")]
    pub size_limit: usize,
}

fn default_size_limit() -> usize {
    DEFAULT_SIZE_LIMIT
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            pattern_mode: PatternMode::default(),
            size_limit: default_size_limit(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            replace: ReplaceConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SearchConfig = serde_norway::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;

        if config.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported {} version: {}",
                CONFIG_FILE, config.version
            )));
        }

        Ok(config)
    }

    /// Load `.dmnsearch.yaml` from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_file = dir.join(CONFIG_FILE);
        if !config_file.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_file).map_err(Error::Io)?;
        Self::from_yaml(&content).map(Some)
    }

    /// Find the nearest `.dmnsearch.yaml` at or above `start`, or the defaults
    pub fn discover(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            if let Some(config) = Self::load_from_dir(dir)? {
                tracing::debug!(dir = %dir.display(), "loaded config");
                return Ok(config);
            }
        }
        Ok(Self::default())
    }

    /// Pattern options for the replace engine
    pub fn pattern_options(&self) -> PatternOptions {
        PatternOptions {
            mode: self.replace.pattern_mode,
            size_limit: self.replace.size_limit,
        }
    }
}
