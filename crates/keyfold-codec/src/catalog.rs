//! Catalog builder: assigns one id per distinct field path in a document.
//!
//! Every object key registers its path before its value is visited, and
//! arrays are walked element by element under the array's own path, so a
//! path seen in any element of a heterogeneous array gets an id.

use keyfold_core::{CodecError, Result, DEFAULT_MAX_DEPTH};
use serde_json::Value;

use crate::ids::{join_path, kind_of, Catalog, Depth, Interner};

/// Build a fresh catalog for a single record or a batch of records.
pub fn build_catalog(document: &Value) -> Result<Catalog> {
    build_catalog_with_limit(document, DEFAULT_MAX_DEPTH)
}

pub fn build_catalog_with_limit(document: &Value, max_depth: usize) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    extend_catalog(&mut catalog, document, max_depth)?;
    Ok(catalog)
}

/// Fold a document's paths into an existing catalog, reusing ids it already holds.
pub fn extend_catalog<I: Interner>(interner: &mut I, document: &Value, max_depth: usize) -> Result<()> {
    if !(document.is_object() || document.is_array()) {
        return Err(CodecError::UnsupportedValue { kind: kind_of(document) });
    }
    register(interner, document, "", Depth::root(max_depth))
}

fn register<I: Interner>(interner: &mut I, value: &Value, parent: &str, depth: Depth) -> Result<()> {
    match value {
        Value::Object(map) => {
            let depth = depth.enter()?;
            for (name, child) in map {
                let path = join_path(parent, name);
                interner.intern(&path);
                register(interner, child, &path, depth)?;
            }
        }
        Value::Array(items) => {
            let depth = depth.enter()?;
            for item in items {
                register(interner, item, parent, depth)?;
            }
        }
        _ => {}
    }
    Ok(())
}
