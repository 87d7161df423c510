//! Configuration file
//!
//! Optional JSON file; every field has a default, and a missing `--config`
//! means all defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::puzzle::GeneratorSettings;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rows per generated table
    #[serde(default = "default_table_rows")]
    pub table_rows: usize,

    /// Smallest generated value
    #[serde(default)]
    pub min_value: i64,

    /// Largest generated value
    #[serde(default = "default_max_value")]
    pub max_value: i64,

    /// Generation attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_table_rows() -> usize {
    10
}
fn default_max_value() -> i64 {
    9
}
fn default_max_attempts() -> u32 {
    64
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_rows: default_table_rows(),
            min_value: 0,
            max_value: default_max_value(),
            max_attempts: default_max_attempts(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate field ranges
    pub fn validate(&self) -> CliResult<()> {
        self.severity()?;
        self.generator_settings()
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))
    }

    /// Parsed minimum log severity
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    /// Settings for the puzzle generator
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            table_rows: self.table_rows,
            min_value: self.min_value,
            max_value: self.max_value,
            max_attempts: self.max_attempts,
        }
    }
}
