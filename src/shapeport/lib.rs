//! # Shapeport Architecture
//!
//! Shapeport converts vector design documents from a source design platform into the
//! document model of a target platform, and computes the operations that bring a document
//! already hosted on the target in line with a fresh conversion.
//!
//! It is a **library**: it never fetches or uploads anything. Callers pass in the
//! deserialized source payload and the hosted target document, and get back a target
//! document, a list of operations and a list of notices.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Loads and saves the identity mapping                     │
//! │  - convert / diff / sync                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Conversion (transform/, translate/, text/, registry.rs)    │
//! │  - Per-kind node transformers over scoped registries        │
//! │  - Pure: source types in, target types out                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Differencing (diff/)                                       │
//! │  - Hosted vs fresh document, ordered operations             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (mapping/)                                   │
//! │  - Abstract MappingStore trait                              │
//! │  - FileMappingStore (production), InMemoryMappingStore      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stable Identity
//!
//! Every target id is derived from a source key through the identity mapping. Once a
//! key is mapped it keeps its id forever, which is what keeps re-sync diffs small. A
//! conversion run loads the whole mapping, appends to it, and the API saves it back.
//! Runs against the same store must not overlap.
//!
//! ## Errors and Notices
//!
//! Broken source assumptions (a missing bounding box, an unsupported node kind, a
//! duplicate library id) abort the run with a [`error::ConvertError`]. So does a custom
//! font that has not been uploaded to the target, since only the operator can fix it.
//! Lossy but harmless conversions (an unsupported paint type, an unlinked remote
//! component) are logged through the `log` facade and the run goes on.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`transform`]: Document orchestration and per-kind node transformers
//! - [`translate`]: Attribute translators shared by the transformers
//! - [`text`]: Text segmentation, font resolution and typographies
//! - [`registry`]: Scoped id, library and object-table lookups
//! - [`diff`]: The differencing engine
//! - [`geometry`]: Matrices, rotation, selection rects, gradients and paths
//! - [`source`]: Source document model
//! - [`target`]: Target document model
//! - [`mapping`]: Identity mapping and its storage
//! - [`config`]: Sync directory configuration
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod diff;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod registry;
pub mod source;
pub mod target;
pub mod text;
pub mod transform;
pub mod translate;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
