//! Global-catalog mode: payload keys become ids of full field paths.

use keyfold_core::{CodecError, Malformed, Result, DEFAULT_MAX_DEPTH};
use serde_json::{Map, Value};
use tracing::debug;

use crate::ids::{field_name, join_path, kind_of, Catalog, Depth, Interner};

/// Encode a document into a fresh catalog and an id-keyed payload.
pub fn encode_with_catalog(document: &Value) -> Result<(Catalog, Value)> {
    encode_with_catalog_limit(document, DEFAULT_MAX_DEPTH)
}

pub fn encode_with_catalog_limit(document: &Value, max_depth: usize) -> Result<(Catalog, Value)> {
    let mut catalog = Catalog::new();
    let payload = encode_into(&mut catalog, document, max_depth)?;
    debug!(paths = catalog.len(), "encoded with global catalog");
    Ok((catalog, payload))
}

/// Encode against a caller-owned catalog. Paths it already knows keep their ids.
pub fn encode_into<I: Interner>(interner: &mut I, document: &Value, max_depth: usize) -> Result<Value> {
    if !(document.is_object() || document.is_array()) {
        return Err(CodecError::UnsupportedValue { kind: kind_of(document) });
    }
    encode_value(interner, document, "", Depth::root(max_depth))
}

fn encode_value<I: Interner>(interner: &mut I, value: &Value, parent: &str, depth: Depth) -> Result<Value> {
    match value {
        Value::Object(map) => {
            let depth = depth.enter()?;
            let mut out = Map::with_capacity(map.len());
            for (name, child) in map {
                let path = join_path(parent, name);
                let id = interner.intern(&path);
                out.insert(id.to_string(), encode_value(interner, child, &path, depth)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let depth = depth.enter()?;
            items
                .iter()
                .map(|item| encode_value(interner, item, parent, depth))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        scalar => Ok(scalar.clone()),
    }
}

/// Rebuild the original document from a payload and the catalog that produced it.
pub fn decode_with_catalog(catalog: &Catalog, payload: &Value) -> Result<Value> {
    decode_with_catalog_limit(catalog, payload, DEFAULT_MAX_DEPTH)
}

pub fn decode_with_catalog_limit(catalog: &Catalog, payload: &Value, max_depth: usize) -> Result<Value> {
    decode_value(catalog, payload, "", Depth::root(max_depth))
}

fn decode_value(catalog: &Catalog, value: &Value, parent: &str, depth: Depth) -> Result<Value> {
    match value {
        Value::Object(map) => {
            let depth = depth.enter()?;
            let mut out = Map::with_capacity(map.len());
            for (id, child) in map {
                let path = catalog.resolve(id).ok_or_else(|| CodecError::unknown_id(id.as_str()))?;
                let name = field_name(path, parent).ok_or_else(|| Malformed::WrongLevel {
                    id: id.clone(),
                    path: path.to_string(),
                    parent: parent.to_string(),
                })?;
                out.insert(name.to_string(), decode_value(catalog, child, path, depth)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let depth = depth.enter()?;
            items
                .iter()
                .map(|item| decode_value(catalog, item, parent, depth))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        scalar => Ok(scalar.clone()),
    }
}
