//! A catalog several threads can encode into at once.

use std::sync::Arc;

use keyfold_core::{Result, DEFAULT_MAX_DEPTH};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::global::encode_into;
use crate::ids::{Catalog, Interner};

/// Cloning shares the same underlying catalog.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl SharedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Encode one record of the batch.
    pub fn encode(&self, record: &Value) -> Result<Value> {
        self.encode_with_limit(record, DEFAULT_MAX_DEPTH)
    }

    pub fn encode_with_limit(&self, record: &Value, max_depth: usize) -> Result<Value> {
        let mut handle = self;
        let payload = encode_into(&mut handle, record, max_depth)?;
        debug!(paths = self.len(), "encoded record into shared catalog");
        Ok(payload)
    }

    /// Owned copy of the catalog as it stands now.
    pub fn snapshot(&self) -> Catalog {
        self.inner.lock().clone()
    }
}

impl From<Catalog> for SharedCatalog {
    fn from(catalog: Catalog) -> Self {
        Self { inner: Arc::new(Mutex::new(catalog)) }
    }
}

impl Interner for &SharedCatalog {
    fn intern(&mut self, key: &str) -> usize {
        self.inner.lock().intern(key)
    }
}
