//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// Nesting ceiling used when no explicit limit is given.
pub const DEFAULT_MAX_DEPTH: usize = 128;

const DEFAULT_MIN_COMPACT_BYTES: usize = 512;

/// Which compaction strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One id -> field path catalog shared by the whole document or batch.
    Global,
    /// Self-describing nodes, each carrying its own id -> field name descriptor.
    #[default]
    Local,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub mode: Mode,
    /// Maximum nesting depth any encode or decode walk may reach.
    pub max_depth: usize,
    /// Documents serializing shorter than this are left uncompacted.
    pub min_compact_bytes: usize,
}

impl CodecConfig {
    pub fn new(mode: Mode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_compact_bytes(mut self, bytes: usize) -> Self {
        self.min_compact_bytes = bytes;
        self
    }

    /// Parse a JSON config document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(CodecError::InvalidConfig("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            min_compact_bytes: DEFAULT_MIN_COMPACT_BYTES,
        }
    }
}
