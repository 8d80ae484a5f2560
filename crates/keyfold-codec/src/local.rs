//! Local-descriptor mode: self-describing `{descriptor, payload}` nodes.
//!
//! Each object level gets its own descriptor mapping ids to bare field
//! names. An array shares one descriptor across all of its object elements,
//! built from the union of their keys in first-seen order. Every nested
//! object or array becomes a nested node, so any object found in a payload
//! value slot is a node and never a literal.

use keyfold_core::{CodecError, Result, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::ids::{kind_of, Depth, Descriptor, Interner};

pub const DESCRIPTOR_KEY: &str = "descriptor";
pub const PAYLOAD_KEY: &str = "payload";

/// One compacted sub-document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactNode {
    pub descriptor: Descriptor,
    pub payload: Value,
}

impl CompactNode {
    pub fn into_value(self) -> Value {
        let mut map = Map::with_capacity(2);
        map.insert(DESCRIPTOR_KEY.into(), self.descriptor.to_value());
        map.insert(PAYLOAD_KEY.into(), self.payload);
        Value::Object(map)
    }

    /// Strictly parse a node from its wire form.
    pub fn from_value(value: &Value) -> Result<Self> {
        let (descriptor, payload) = split_node(value)?;
        Ok(Self { descriptor, payload: payload.clone() })
    }

    /// Whether an array element carries the reserved node keys.
    fn marks_node(map: &Map<String, Value>) -> bool {
        map.contains_key(DESCRIPTOR_KEY) || map.contains_key(PAYLOAD_KEY)
    }
}

pub fn compact_encode(document: &Value) -> Result<CompactNode> {
    compact_encode_with_limit(document, DEFAULT_MAX_DEPTH)
}

pub fn compact_encode_with_limit(document: &Value, max_depth: usize) -> Result<CompactNode> {
    let node = encode_node(document, Depth::root(max_depth))?;
    debug!(fields = node.descriptor.len(), "encoded local descriptor node");
    Ok(node)
}

fn encode_node(value: &Value, depth: Depth) -> Result<CompactNode> {
    let depth = depth.enter()?;
    let mut descriptor = Descriptor::new();
    let payload = match value {
        Value::Object(map) => Value::Object(encode_record(map, &mut descriptor, depth)?),
        Value::Array(items) => {
            for item in items {
                if let Value::Object(map) = item {
                    for name in map.keys() {
                        descriptor.intern(name);
                    }
                }
            }
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(match item {
                    Value::Object(map) => Value::Object(encode_record(map, &mut descriptor, depth.enter()?)?),
                    Value::Array(_) => encode_node(item, depth)?.into_value(),
                    scalar => scalar.clone(),
                });
            }
            Value::Array(out)
        }
        scalar => return Err(CodecError::UnsupportedValue { kind: kind_of(scalar) }),
    };
    Ok(CompactNode { descriptor, payload })
}

fn encode_record(map: &Map<String, Value>, descriptor: &mut Descriptor, depth: Depth) -> Result<Map<String, Value>> {
    let mut record = Map::with_capacity(map.len());
    for (name, child) in map {
        let id = descriptor.intern(name);
        let slot = match child {
            Value::Object(_) | Value::Array(_) => encode_node(child, depth)?.into_value(),
            scalar => scalar.clone(),
        };
        record.insert(id.to_string(), slot);
    }
    Ok(record)
}

pub fn compact_decode(node: &CompactNode) -> Result<Value> {
    compact_decode_with_limit(node, DEFAULT_MAX_DEPTH)
}

pub fn compact_decode_with_limit(node: &CompactNode, max_depth: usize) -> Result<Value> {
    decode_parts(&node.descriptor, &node.payload, Depth::root(max_depth))
}

/// Decode straight from the wire form without copying the payload first.
pub fn compact_decode_value(value: &Value, max_depth: usize) -> Result<Value> {
    decode_nested(value, Depth::root(max_depth))
}

fn split_node(value: &Value) -> Result<(Descriptor, &Value)> {
    let map = value
        .as_object()
        .ok_or_else(|| CodecError::shape(format!("compact node must be an object, found {}", kind_of(value))))?;
    let descriptor = map.get(DESCRIPTOR_KEY).ok_or_else(|| CodecError::missing(DESCRIPTOR_KEY))?;
    let payload = map.get(PAYLOAD_KEY).ok_or_else(|| CodecError::missing(PAYLOAD_KEY))?;
    if let Some(extra) = map.keys().find(|k| *k != DESCRIPTOR_KEY && *k != PAYLOAD_KEY) {
        return Err(CodecError::shape(format!("unexpected field `{extra}` in compact node")));
    }
    Ok((Descriptor::from_value(descriptor, DESCRIPTOR_KEY)?, payload))
}

fn decode_nested(value: &Value, depth: Depth) -> Result<Value> {
    let (descriptor, payload) = split_node(value)?;
    decode_parts(&descriptor, payload, depth)
}

fn decode_parts(descriptor: &Descriptor, payload: &Value, depth: Depth) -> Result<Value> {
    let depth = depth.enter()?;
    match payload {
        Value::Object(record) => decode_record(descriptor, record, depth).map(Value::Object),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(match item {
                    Value::Object(map) if CompactNode::marks_node(map) => decode_nested(item, depth)?,
                    Value::Object(record) => Value::Object(decode_record(descriptor, record, depth.enter()?)?),
                    Value::Array(_) => {
                        return Err(CodecError::shape("array inside a payload array must be a compact node"));
                    }
                    scalar => scalar.clone(),
                });
            }
            Ok(Value::Array(out))
        }
        other => Err(CodecError::shape(format!("payload must be an object or an array, found {}", kind_of(other)))),
    }
}

fn decode_record(descriptor: &Descriptor, record: &Map<String, Value>, depth: Depth) -> Result<Map<String, Value>> {
    let mut out = Map::with_capacity(record.len());
    for (id, slot) in record {
        let name = descriptor.resolve(id).ok_or_else(|| CodecError::unknown_id(id.as_str()))?;
        let value = match slot {
            Value::Object(_) => decode_nested(slot, depth)?,
            Value::Array(_) => {
                return Err(CodecError::shape(format!("field {id} holds a bare array, expected a compact node")));
            }
            scalar => scalar.clone(),
        };
        out.insert(name.to_string(), value);
    }
    Ok(out)
}
