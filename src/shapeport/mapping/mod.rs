//! # Identity Mapping Store
//!
//! Every target object id produced by a conversion comes from this table. A source key
//! (node id, component key, image ref, font key) is mapped to a target [`Uuid`] the first
//! time it is seen and keeps that value for the lifetime of the store. This is what keeps
//! re-synchronization diffs small: a node that did not change on the source side gets the
//! same id on every run, so the differencing engine sees an untouched object instead of a
//! remove/add pair.
//!
//! ## Tables
//!
//! - `nodes`: source node ids and other structural keys (pages, components, synthetic
//!   shapes such as mask groups, shadow ids).
//! - `media`: source image refs → target media ids.
//! - `fonts`: `"<family>-<variant>"` keys → ids of fonts uploaded to the target team.
//!   This table is never minted into by a conversion; fonts must be uploaded first.
//!
//! New ids are UUIDv7, so the order in which they were minted can be recovered by sorting.
//!
//! ## Persistence
//!
//! The store is abstracted behind [`MappingStore`]:
//!
//! - [`fs::FileMappingStore`]: a single pretty-printed JSON file
//! - [`memory::InMemoryMappingStore`]: no persistence, for tests
//!
//! A run loads the full mapping, appends to it while converting, and saves it back at the
//! end. Runs against the same store must not overlap.

use crate::error::{ConvertError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IdMapping {
    #[serde(default)]
    pub nodes: BTreeMap<String, Uuid>,
    #[serde(default)]
    pub media: BTreeMap<String, Uuid>,
    #[serde(default)]
    pub fonts: BTreeMap<String, Uuid>,
    #[serde(default)]
    pub last_export: Option<DateTime<Utc>>,
    #[serde(skip)]
    minted: usize,
}

impl IdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the target id for `key`, minting and recording a new one if unseen.
    pub fn translate_id(&mut self, key: &str) -> Uuid {
        mint(&mut self.nodes, &mut self.minted, key)
    }

    pub fn translate_media(&mut self, key: &str) -> Uuid {
        mint(&mut self.media, &mut self.minted, key)
    }

    /// Returns the already-mapped target id for `key`.
    pub fn lookup_id(&self, key: &str) -> Result<Uuid> {
        self.nodes
            .get(key)
            .copied()
            .ok_or_else(|| ConvertError::UnregisteredNode(key.to_string()))
    }

    pub fn font_id(&self, key: &str) -> Option<Uuid> {
        self.fonts.get(key).copied()
    }

    /// Records a font uploaded to the target team under `key`.
    pub fn register_font(&mut self, key: &str, id: Uuid) {
        self.fonts.insert(key.to_string(), id);
    }

    /// Pins `key` to a known target id. Used when seeding the store from an existing
    /// target document.
    pub fn pin_id(&mut self, key: &str, id: Uuid) -> Result<()> {
        match self.nodes.get(key) {
            Some(existing) if *existing != id => Err(ConvertError::DuplicateEntity {
                kind: "node mapping",
                id: key.to_string(),
            }),
            _ => {
                self.nodes.insert(key.to_string(), id);
                Ok(())
            }
        }
    }

    /// Number of ids minted since this mapping was loaded.
    pub fn minted(&self) -> usize {
        self.minted
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_export = Some(at);
    }
}

fn mint(table: &mut BTreeMap<String, Uuid>, minted: &mut usize, key: &str) -> Uuid {
    if let Some(id) = table.get(key) {
        return *id;
    }
    let id = Uuid::now_v7();
    log::debug!("minted {} for {}", id, key);
    table.insert(key.to_string(), id);
    *minted += 1;
    id
}

/// Abstract interface for mapping persistence.
pub trait MappingStore {
    /// Load the full mapping. A store that has never been saved yields an empty mapping.
    fn load(&self) -> Result<IdMapping>;

    /// Persist the full mapping, replacing what was stored.
    fn save(&mut self, mapping: &IdMapping) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_id_is_stable() {
        let mut mapping = IdMapping::new();
        let first = mapping.translate_id("1:2");
        let second = mapping.translate_id("1:2");
        assert_eq!(first, second);
        assert_eq!(mapping.minted(), 1);
    }

    #[test]
    fn unseen_ids_are_fresh_and_recorded() {
        let mut mapping = IdMapping::new();
        let a = mapping.translate_id("1:2");
        let b = mapping.translate_id("1:3");
        assert_ne!(a, b);
        assert_eq!(mapping.nodes.get("1:3"), Some(&b));
    }

    #[test]
    fn media_and_node_tables_are_separate() {
        let mut mapping = IdMapping::new();
        let node = mapping.translate_id("abc");
        let media = mapping.translate_media("abc");
        assert_ne!(node, media);
    }

    #[test]
    fn lookup_of_unmapped_id_fails() {
        let mapping = IdMapping::new();
        assert!(matches!(
            mapping.lookup_id("9:9"),
            Err(ConvertError::UnregisteredNode(_))
        ));
    }

    #[test]
    fn pin_rejects_remap() {
        let mut mapping = IdMapping::new();
        let id = mapping.translate_id("0:1");
        assert!(mapping.pin_id("0:1", id).is_ok());
        assert!(mapping.pin_id("0:1", Uuid::nil()).is_err());
    }

    #[test]
    fn fonts_are_lookup_only() {
        let mut mapping = IdMapping::new();
        assert_eq!(mapping.font_id("Brand Sans-regular"), None);
        let id = Uuid::now_v7();
        mapping.register_font("Brand Sans-regular", id);
        assert_eq!(mapping.font_id("Brand Sans-regular"), Some(id));
    }

    #[test]
    fn serializes_with_kebab_keys() {
        let mut mapping = IdMapping::new();
        mapping.translate_id("0:1");
        mapping.touch(Utc::now());
        let json = serde_json::to_value(&mapping).unwrap();
        assert!(json.get("last-export").is_some());
        assert!(json["nodes"].get("0:1").is_some());

        let parsed: IdMapping = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.nodes, mapping.nodes);
        assert_eq!(parsed.minted(), 0);
    }
}
