//! # API Facade
//!
//! The single entry point for embedding applications. It wires the identity mapping
//! store, the font catalogs and the sync configuration around the pure conversion and
//! differencing layers.
//!
//! ## What the API Does NOT Do
//!
//! - **Fetching**: source payloads and the hosted target document are passed in
//! - **Uploading**: operations are returned, never sent
//! - **Presentation**: notices are data, not printed lines
//!
//! ## Generic Over MappingStore
//!
//! `SyncApi<S: MappingStore>` is generic over where the mapping lives:
//! - Production: `SyncApi<FileMappingStore>`, opened from a sync directory
//! - Testing: `SyncApi<InMemoryMappingStore>`
//!
//! Only [`SyncApi::sync`] and [`SyncApi::register_font`] write to the store. Previews
//! through [`SyncApi::convert`] mint ids in a throwaway copy, so running them any number
//! of times leaves the stored mapping unchanged.

use crate::config::SyncConfig;
use crate::diff::{self, DiffResult};
use crate::error::Result;
use crate::mapping::fs::FileMappingStore;
use crate::mapping::MappingStore;
use crate::source::{SourceFile, SourceLibraries};
use crate::target::TargetDocument;
use crate::text::FontCatalogs;
use crate::transform::{convert_document, Conversion, Notice};
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

/// Outcome of a sync run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub document: TargetDocument,
    pub diff: DiffResult,
    pub notices: Vec<Notice>,
    /// Ids minted for source keys seen for the first time.
    pub minted: usize,
}

pub struct SyncApi<S: MappingStore> {
    store: S,
    catalogs: FontCatalogs,
    config: SyncConfig,
}

impl SyncApi<FileMappingStore> {
    /// Opens a sync directory: its config, its mapping file and its font catalogs.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let config = SyncConfig::load(dir)?;
        let catalogs = FontCatalogs::load(config.font_catalog_path(dir))?;
        let store = FileMappingStore::new(config.mapping_path(dir));
        Ok(Self::new(store, catalogs, config))
    }
}

impl<S: MappingStore> SyncApi<S> {
    pub fn new(store: S, catalogs: FontCatalogs, config: SyncConfig) -> Self {
        Self {
            store,
            catalogs,
            config,
        }
    }

    /// Converts without persisting any newly minted id.
    pub fn convert(&self, file: &SourceFile, libraries: &SourceLibraries) -> Result<Conversion> {
        let mut mapping = self.store.load()?;
        convert_document(
            file,
            libraries,
            &self.catalogs,
            self.config.include_hidden,
            &mut mapping,
        )
    }

    pub fn diff(&self, hosted: &TargetDocument, fresh: &TargetDocument) -> Result<DiffResult> {
        diff::diff(hosted, fresh)
    }

    /// Converts, diffs against the hosted document and persists the mapping.
    ///
    /// Without a hosted document the target file is assumed to be new and empty, so every
    /// page is reported as added.
    pub fn sync(
        &mut self,
        file: &SourceFile,
        libraries: &SourceLibraries,
        hosted: Option<&TargetDocument>,
    ) -> Result<SyncReport> {
        let mut mapping = self.store.load()?;
        let conversion = convert_document(
            file,
            libraries,
            &self.catalogs,
            self.config.include_hidden,
            &mut mapping,
        )?;

        let empty;
        let hosted = match hosted {
            Some(hosted) => hosted,
            None => {
                empty = TargetDocument::new(conversion.document.id, &conversion.document.name);
                &empty
            }
        };
        let diff = diff::diff(hosted, &conversion.document)?;

        let minted = mapping.minted();
        mapping.touch(Utc::now());
        self.store.save(&mapping)?;
        log::info!(
            "synced {}: {} operations, {} new ids",
            conversion.document.name,
            diff.operations.len(),
            minted
        );

        Ok(SyncReport {
            document: conversion.document,
            diff,
            notices: conversion.notices,
            minted,
        })
    }

    /// Records a font uploaded to the target team so text using it can be converted.
    /// `variant` is the target variant id: `regular`, `italic`, `700`, `700italic`.
    pub fn register_font(&mut self, family: &str, variant: &str, id: Uuid) -> Result<()> {
        let mut mapping = self.store.load()?;
        mapping.register_font(&format!("{}-{}", family, variant), id);
        self.store.save(&mapping)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
