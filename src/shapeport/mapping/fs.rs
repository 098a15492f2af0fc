use super::{IdMapping, MappingStore};
use crate::error::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Mapping tables persisted as one JSON file.
pub struct FileMappingStore {
    path: PathBuf,
}

impl FileMappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(ConvertError::Io)?;
            }
        }
        Ok(())
    }
}

impl MappingStore for FileMappingStore {
    fn load(&self) -> Result<IdMapping> {
        if !self.path.exists() {
            return Ok(IdMapping::new());
        }
        let content = fs::read_to_string(&self.path).map_err(ConvertError::Io)?;
        if content.trim().is_empty() {
            return Ok(IdMapping::new());
        }
        let mapping: IdMapping =
            serde_json::from_str(&content).map_err(ConvertError::Serialization)?;
        Ok(mapping)
    }

    fn save(&mut self, mapping: &IdMapping) -> Result<()> {
        self.ensure_parent()?;

        // Write to a sibling temp file first so a failed write never truncates the tables
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(mapping).map_err(ConvertError::Serialization)?;
        fs::write(&tmp, content).map_err(ConvertError::Io)?;
        fs::rename(&tmp, &self.path).map_err(ConvertError::Io)?;
        Ok(())
    }
}
