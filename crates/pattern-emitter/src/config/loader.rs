//! Configuration loader for emitters
//!
//! Reads an [`EmitterConfig`] from YAML or JSON. A file that does not exist
//! yields the defaults; a file that exists but does not parse is an error.

use std::{fs, path::Path};

use tracing::debug;

use super::{validator::ConfigValidator, EmitterConfig};
use crate::error::{EmitterError, Result};

/// Configuration loader for emitters
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, `.json` files as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or contains an invalid `emitter` section.
    pub fn load_from_path(path: &Path) -> Result<EmitterConfig> {
        if !path.exists() {
            debug!(path = %path.display(), "No emitter config file, using defaults");
            return Ok(EmitterConfig::default());
        }

        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(EmitterError::InvalidConfiguration(format!(
                    "Unsupported config file extension: {}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), ?config, "Loaded emitter config");
        Ok(config)
    }

    /// Parse configuration from YAML
    ///
    /// Expected format:
    /// ```yaml
    /// emitter:
    ///   match_cache: true
    ///   max_listeners: 25
    /// ```
    ///
    /// Missing fields, or a missing `emitter` section, take their defaults.
    pub fn from_yaml_str(content: &str) -> Result<EmitterConfig> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;

        let config = match value.get("emitter") {
            Some(section) if !section.is_null() => {
                serde_yaml::from_value::<EmitterConfig>(section.clone())?
            }
            _ => EmitterConfig::default(),
        };

        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Parse configuration from JSON
    ///
    /// Same shape as the YAML form: `{"emitter": {...}}`.
    pub fn from_json_str(content: &str) -> Result<EmitterConfig> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        let config = match value.get("emitter") {
            Some(section) if !section.is_null() => {
                serde_json::from_value::<EmitterConfig>(section.clone())?
            }
            _ => EmitterConfig::default(),
        };

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
