//! Configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use uuid::Uuid;
use wpd_command::keys;
use wpd_core::PropertyKey;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Friendly names for property keys
    #[serde(default, rename = "key")]
    pub keys: Vec<KeyName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print a JSON document instead of text
    #[serde(default)]
    pub json: bool,
}

/// A named property key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyName {
    pub name: String,
    pub fmtid: Uuid,
    pub pid: u32,
}

impl Config {
    /// Key names from the config, on top of the common protocol keys
    pub fn key_names(&self) -> HashMap<PropertyKey, String> {
        let mut names: HashMap<PropertyKey, String> = [
            (keys::COMMAND_CATEGORY, "WPD_PROPERTY_COMMON_COMMAND_CATEGORY"),
            (keys::COMMAND_ID, "WPD_PROPERTY_COMMON_COMMAND_ID"),
            (keys::HRESULT, "WPD_PROPERTY_COMMON_HRESULT"),
            (keys::DRIVER_ERROR_CODE, "WPD_PROPERTY_COMMON_DRIVER_ERROR_CODE"),
        ]
        .into_iter()
        .map(|(key, name)| (key, name.to_string()))
        .collect();

        for entry in &self.keys {
            names.insert(PropertyKey::new(entry.fmtid, entry.pid), entry.name.clone());
        }
        names
    }
}

/// Load configuration from file, or `None` if it doesn't exist.
///
/// Runs before logging is set up, so the outcome is reported separately
/// through [`log_loaded`].
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Log where the active configuration came from
pub fn log_loaded(path: &Path, loaded: Option<&Config>) {
    match loaded {
        Some(config) => {
            info!(path = %path.display(), keys = config.keys.len(), "Loaded configuration");
        }
        None => {
            info!(
                path = %path.display(),
                "Configuration file not found, using defaults"
            );
        }
    }
}
