//! Run configuration for the simulation engine.
//!
//! The canonical configuration lives in `homestead-config.yaml` at the
//! project root. This module defines the strongly-typed struct that
//! mirrors the YAML structure and a loader that reads the file. All
//! fields have defaults so a partial file (or none of the optional
//! fields) still produces a runnable configuration.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Errors that can occur when loading the run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level run configuration.
///
/// Mirrors the structure of `homestead-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Path to the material catalog JSON file.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Number of simulated days to run.
    #[serde(default = "default_days")]
    pub days: u64,

    /// Labor supplied to every activity, every day.
    #[serde(default = "default_labor")]
    pub labor: Decimal,

    /// Land supplied to every activity, every day.
    #[serde(default = "default_land")]
    pub land: Decimal,

    /// Stock levels at the start of day one.
    #[serde(default)]
    pub initial_stocks: BTreeMap<String, Decimal>,

    /// Output goods to run, in order, once per day. The order matters:
    /// each activity sees the stock state its predecessors left behind.
    #[serde(default)]
    pub activities: Vec<String>,
}

impl RunConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            days: default_days(),
            labor: default_labor(),
            land: default_land(),
            initial_stocks: BTreeMap::new(),
            activities: Vec::new(),
        }
    }
}

fn default_catalog_path() -> String {
    String::from("materials.json")
}

const fn default_days() -> u64 {
    10
}

const fn default_labor() -> Decimal {
    Decimal::TEN
}

fn default_land() -> Decimal {
    Decimal::from(20u32)
}
