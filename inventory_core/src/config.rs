use crate::persistence::DEFAULT_SAVE_KEY;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML configuration file holding an `[inventory]` table
#[derive(Debug, Default, Deserialize)]
pub struct InventoryFileConfig {
    #[serde(default)]
    pub inventory: InventoryConfig,
}

/// Inventory size and save location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_save_key")]
    pub save_key: String,
}

fn default_capacity() -> usize {
    20
}
fn default_save_key() -> String {
    DEFAULT_SAVE_KEY.to_string()
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            capacity: default_capacity(),
            save_key: default_save_key(),
        }
    }
}

impl InventoryConfig {
    /// Parse from TOML text; missing fields take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, None)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;
        Self::parse(&content, Some(path))
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        let file: InventoryFileConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.map(Path::to_path_buf),
        })?;
        let config = file.inventory;
        config.validate().map_err(|message| ConfigError::Validation {
            message,
            path: path.map(Path::to_path_buf),
        })?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be at least 1".to_string());
        }
        if self.save_key.trim().is_empty() {
            return Err("save_key must not be empty".to_string());
        }
        Ok(())
    }
}
