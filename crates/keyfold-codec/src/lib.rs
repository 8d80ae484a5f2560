//! Keyfold: structural compaction of JSON documents.
//!
//! Field names are replaced by short numeric ids, in one of two modes:
//! 1. Global: a single id -> field path catalog for a document or batch
//! 2. Local: self-describing nodes, each with its own id -> name descriptor
//!
//! Both modes decode losslessly back to the original document.

pub mod catalog;
pub mod global;
pub mod ids;
pub mod local;
pub mod pipeline;
pub mod shared;

pub use catalog::{build_catalog, extend_catalog};
pub use global::{decode_with_catalog, encode_into, encode_with_catalog};
pub use ids::{Catalog, Descriptor, IdTable, Interner};
pub use keyfold_core::{CodecConfig, CodecError, Malformed, Mode, Result};
pub use local::{compact_decode, compact_encode, CompactNode};
pub use pipeline::{decode, encode, normalize_records, CompactionResult, Compactor};
pub use shared::SharedCatalog;
