//! In-memory store for tests.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;

/// Non-durable [`KeyValueStore`] holding documents as JSON values.
///
/// Used by unit tests so service logic can be exercised without a
/// data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document was ever saved under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.documents.lock().contains_key(name)
    }
}

impl KeyValueStore for MemoryStore {
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let documents = self.documents.lock();
        match documents.get(name) {
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| StoreError::Decode {
                    name: name.to_string(),
                    source: e,
                })
            }
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Encode {
            name: name.to_string(),
            source: e,
        })?;
        self.documents.lock().insert(name.to_string(), value);
        Ok(())
    }
}
