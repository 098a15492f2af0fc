use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_MAPPING_FILE: &str = "mapping.json";
const DEFAULT_FONT_CATALOG_FILE: &str = "fonts.json";

/// Configuration for a sync directory, stored in `<dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SyncConfig {
    /// File holding the identity mapping tables
    #[serde(default = "default_mapping_file")]
    pub mapping_file: String,

    /// File holding the hosted and local font catalogs
    #[serde(default = "default_font_catalog_file")]
    pub font_catalog_file: String,

    /// Convert invisible source layers (as hidden target shapes)
    #[serde(default = "default_include_hidden")]
    pub include_hidden: bool,
}

fn default_mapping_file() -> String {
    DEFAULT_MAPPING_FILE.to_string()
}

fn default_font_catalog_file() -> String {
    DEFAULT_FONT_CATALOG_FILE.to_string()
}

fn default_include_hidden() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mapping_file: default_mapping_file(),
            font_catalog_file: default_font_catalog_file(),
            include_hidden: default_include_hidden(),
        }
    }
}

impl SyncConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ConvertError::Io)?;
        let config: SyncConfig =
            serde_json::from_str(&content).map_err(ConvertError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ConvertError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ConvertError::Serialization)?;
        fs::write(config_path, content).map_err(ConvertError::Io)?;
        Ok(())
    }

    pub fn mapping_path<P: AsRef<Path>>(&self, dir: P) -> std::path::PathBuf {
        dir.as_ref().join(&self.mapping_file)
    }

    pub fn font_catalog_path<P: AsRef<Path>>(&self, dir: P) -> std::path::PathBuf {
        dir.as_ref().join(&self.font_catalog_file)
    }
}
