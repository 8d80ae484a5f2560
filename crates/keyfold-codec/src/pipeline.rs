//! Collaborator-facing entry points: encode/decode by mode, and the
//! size-aware compactor that decides whether compaction pays off.

use keyfold_core::{CodecConfig, CodecError, Mode, Result, DEFAULT_MAX_DEPTH};
use serde_json::{Map, Value};
use tracing::debug;

use crate::global::{decode_with_catalog_limit, encode_with_catalog_limit};
use crate::ids::{kind_of, Catalog};
use crate::local::{compact_decode_value, compact_encode_with_limit, PAYLOAD_KEY};

pub const CATALOG_KEY: &str = "catalog";

/// Encode a document into its compact wire form for the given mode.
///
/// Global mode yields `{"catalog": {..}, "payload": ..}`; local mode yields
/// a self-describing `{"descriptor": {..}, "payload": ..}` node.
pub fn encode(document: &Value, mode: Mode) -> Result<Value> {
    encode_with_limit(document, mode, DEFAULT_MAX_DEPTH)
}

pub fn encode_with_limit(document: &Value, mode: Mode, max_depth: usize) -> Result<Value> {
    match mode {
        Mode::Global => {
            let (catalog, payload) = encode_with_catalog_limit(document, max_depth)?;
            let mut map = Map::with_capacity(2);
            map.insert(CATALOG_KEY.into(), catalog.to_value());
            map.insert(PAYLOAD_KEY.into(), payload);
            Ok(Value::Object(map))
        }
        Mode::Local => Ok(compact_encode_with_limit(document, max_depth)?.into_value()),
    }
}

/// Inverse of [`encode`] for the same mode.
pub fn decode(repr: &Value, mode: Mode) -> Result<Value> {
    decode_with_limit(repr, mode, DEFAULT_MAX_DEPTH)
}

pub fn decode_with_limit(repr: &Value, mode: Mode, max_depth: usize) -> Result<Value> {
    match mode {
        Mode::Global => {
            let map = repr.as_object().ok_or_else(|| {
                CodecError::shape(format!("global representation must be an object, found {}", kind_of(repr)))
            })?;
            let catalog = map.get(CATALOG_KEY).ok_or_else(|| CodecError::missing(CATALOG_KEY))?;
            let payload = map.get(PAYLOAD_KEY).ok_or_else(|| CodecError::missing(PAYLOAD_KEY))?;
            let catalog = Catalog::from_value(catalog, CATALOG_KEY)?;
            decode_with_catalog_limit(&catalog, payload, max_depth)
        }
        Mode::Local => compact_decode_value(repr, max_depth),
    }
}

/// Turn a tool output into a batch of records: arrays yield their
/// elements, anything else becomes a batch of one.
pub fn normalize_records(output: Value) -> Vec<Value> {
    match output {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Outcome of one compaction attempt.
#[derive(Debug, Clone)]
pub struct CompactionResult {
    pub output: Value,
    /// False when `output` is the untouched input.
    pub compacted: bool,
    pub mode: Mode,
    pub original_len: usize,
    pub compacted_len: usize,
}

impl CompactionResult {
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 { return 1.0; }
        self.compacted_len as f64 / self.original_len as f64
    }

    pub fn reduction_pct(&self) -> f64 {
        if self.original_len == 0 { return 0.0; }
        (1.0 - self.ratio()) * 100.0
    }
}

/// Applies the configured mode and size threshold.
#[derive(Debug, Clone)]
pub struct Compactor {
    config: CodecConfig,
}

impl Compactor {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn global() -> Self { Self { config: CodecConfig::new(Mode::Global) } }
    pub fn local() -> Self { Self { config: CodecConfig::new(Mode::Local) } }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compact a document if it is large enough and the result is smaller.
    pub fn compact(&self, document: &Value) -> Result<CompactionResult> {
        let original_len = serde_json::to_string(document)?.len();
        let mode = self.config.mode;
        let passthrough = |reason: &str| {
            debug!(%mode, original_len, reason, "left document uncompacted");
            CompactionResult {
                output: document.clone(),
                compacted: false,
                mode,
                original_len,
                compacted_len: original_len,
            }
        };

        if !(document.is_object() || document.is_array()) {
            return Ok(passthrough("scalar"));
        }
        if original_len < self.config.min_compact_bytes {
            return Ok(passthrough("below threshold"));
        }

        let output = encode_with_limit(document, mode, self.config.max_depth)?;
        let compacted_len = serde_json::to_string(&output)?.len();
        if compacted_len >= original_len {
            return Ok(passthrough("no gain"));
        }

        debug!(%mode, original_len, compacted_len, "compacted document");
        Ok(CompactionResult { output, compacted: true, mode, original_len, compacted_len })
    }

    /// Normalize a tool output into a batch of records and compact it as one array.
    pub fn compact_records(&self, output: Value) -> Result<CompactionResult> {
        let batch = Value::Array(normalize_records(output));
        self.compact(&batch)
    }

    /// Decode a compact representation produced in the configured mode.
    pub fn restore(&self, repr: &Value) -> Result<Value> {
        decode_with_limit(repr, self.config.mode, self.config.max_depth)
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self { config: CodecConfig::default() }
    }
}
