//! Append-only id tables.
//!
//! A [`Catalog`] maps ids to full field paths for a whole document or batch;
//! a [`Descriptor`] maps ids to bare field names for one nesting level. Both
//! are the same structure: ids are 1-based, handed out in first-seen order,
//! and never reassigned.

use std::collections::{BTreeMap, HashMap};

use keyfold_core::{CodecError, Result};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator between field names in a field path.
pub const PATH_SEPARATOR: char = '.';

/// Anything that can hand out a stable id for a key.
pub trait Interner {
    /// Return the id already assigned to `key`, or assign the next one.
    fn intern(&mut self, key: &str) -> usize;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdTable {
    entries: Vec<String>,
    index: HashMap<String, usize>,
}

/// id -> field path, shared across a batch.
pub type Catalog = IdTable;

/// id -> field name, scoped to one level.
pub type Descriptor = IdTable;

impl IdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn id_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: usize) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// Look up the entry for an id given in its wire (string) form.
    pub fn resolve(&self, id: &str) -> Option<&str> {
        parse_id(id).and_then(|n| self.get(n))
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i + 1, entry.as_str()))
    }

    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(id, entry)| (id.to_string(), Value::String(entry.to_string())))
            .collect();
        Value::Object(map)
    }

    /// Parse the wire form `{"1": "...", "2": "..."}`.
    ///
    /// `what` names the table in error messages (`descriptor` or `catalog`).
    pub fn from_value(value: &Value, what: &str) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| CodecError::shape(format!("{what} must be an object")))?;
        let mut slots: Vec<Option<&str>> = vec![None; map.len()];
        for (id, entry) in map {
            let n = parse_id(id)
                .filter(|n| *n <= map.len())
                .ok_or_else(|| CodecError::shape(format!("{what} id {id:?} is out of range")))?;
            let entry = entry
                .as_str()
                .ok_or_else(|| CodecError::shape(format!("{what} entry {id} is not a string")))?;
            slots[n - 1] = Some(entry);
        }
        Self::from_slots(slots).map_err(|msg| CodecError::shape(format!("{what} {msg}")))
    }

    fn from_slots<'a>(slots: impl IntoIterator<Item = Option<&'a str>>) -> std::result::Result<Self, String> {
        let mut table = Self::new();
        for (i, slot) in slots.into_iter().enumerate() {
            let entry = slot.ok_or_else(|| format!("is missing id {}", i + 1))?;
            if table.index.contains_key(entry) {
                return Err(format!("maps `{entry}` to more than one id"));
            }
            table.intern(entry);
        }
        Ok(table)
    }
}

impl Interner for IdTable {
    fn intern(&mut self, key: &str) -> usize {
        if let Some(&id) = self.index.get(key) {
            return id;
        }
        self.entries.push(key.to_string());
        let id = self.entries.len();
        self.index.insert(key.to_string(), id);
        id
    }
}

impl Serialize for IdTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, entry) in self.iter() {
            map.serialize_entry(&id.to_string(), entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IdTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut slots: Vec<Option<&str>> = vec![None; raw.len()];
        for (id, entry) in &raw {
            let n = parse_id(id)
                .filter(|n| *n <= raw.len())
                .ok_or_else(|| <D::Error as de::Error>::custom(format!("id {id:?} is out of range")))?;
            slots[n - 1] = Some(entry.as_str());
        }
        Self::from_slots(slots).map_err(<D::Error as de::Error>::custom)
    }
}

/// Parse a canonical decimal id: digits only, no leading zero, at least 1.
pub fn parse_id(id: &str) -> Option<usize> {
    let bytes = id.as_bytes();
    if bytes.is_empty() || bytes[0] == b'0' || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    id.parse().ok()
}

/// Child field path under `parent`; the root has an empty parent.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        let mut path = String::with_capacity(parent.len() + 1 + name.len());
        path.push_str(parent);
        path.push(PATH_SEPARATOR);
        path.push_str(name);
        path
    }
}

/// Recover a field's own name from its full path, given the parent path.
pub fn field_name<'a>(path: &'a str, parent: &str) -> Option<&'a str> {
    if parent.is_empty() {
        return Some(path);
    }
    path.strip_prefix(parent)?.strip_prefix(PATH_SEPARATOR)
}

/// Nesting counter carried through every recursive walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depth {
    current: usize,
    limit: usize,
}

impl Depth {
    pub(crate) fn root(limit: usize) -> Self {
        Self { current: 0, limit }
    }

    /// Step into one more container.
    pub(crate) fn enter(self) -> Result<Self> {
        if self.current >= self.limit {
            return Err(CodecError::DepthExceeded { limit: self.limit });
        }
        Ok(Self { current: self.current + 1, ..self })
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
