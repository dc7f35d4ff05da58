// src/config.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

use crate::error::{MarshalError, Result};

/// Knobs for normalization and style rendering.
///
/// Every field has a default, so a YAML file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalConfig {
    /// Joins a duplicated column name and its counter (`a`, `a_1`, ...).
    pub name_collision_separator: String,
    /// Prefix for names synthesized for arrays and iterables.
    pub synthesized_name_prefix: String,
    /// String shown for a null cell in display values.
    pub null_display: String,
    /// Prefix put in front of the style id in every CSS selector.
    pub table_selector_prefix: String,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            name_collision_separator: "_".to_string(),
            synthesized_name_prefix: String::new(),
            null_display: "None".to_string(),
            table_selector_prefix: "#T_".to_string(),
        }
    }
}

impl MarshalConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: MarshalConfig =
            serde_yaml::from_str(text).map_err(|e| MarshalError::Config(e.to_string()))?;
        if cfg.name_collision_separator.is_empty() {
            return Err(MarshalError::Config(
                "name_collision_separator must not be empty".into(),
            ));
        }
        Ok(cfg)
    }

    /// Read a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| MarshalError::Config(format!("reading {}: {}", path.display(), e)))?;
        let cfg = Self::from_yaml_str(&text)?;
        debug!(path = %path.display(), "loaded marshal config");
        Ok(cfg)
    }
}
