use super::{IdMapping, MappingStore};
use crate::error::{ConvertError, Result};

/// In-memory mapping storage for testing.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryMappingStore {
    mapping: IdMapping,
    saves: usize,
    simulate_write_error: bool,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mapping: IdMapping) -> Self {
        Self {
            mapping,
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// How many times the mapping was saved.
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn mapping(&self) -> &IdMapping {
        &self.mapping
    }
}

impl MappingStore for InMemoryMappingStore {
    fn load(&self) -> Result<IdMapping> {
        let mut mapping = IdMapping::new();
        mapping.nodes = self.mapping.nodes.clone();
        mapping.media = self.mapping.media.clone();
        mapping.fonts = self.mapping.fonts.clone();
        mapping.last_export = self.mapping.last_export;
        Ok(mapping)
    }

    fn save(&mut self, mapping: &IdMapping) -> Result<()> {
        if self.simulate_write_error {
            return Err(ConvertError::Store("Simulated write error".to_string()));
        }
        self.mapping = mapping.clone();
        self.saves += 1;
        Ok(())
    }
}
