//! JSON-file store with atomic saves.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;

/// File-backed store keeping one `<name>.json` document per logical
/// store under a data directory.
///
/// Saves write `<name>.json.tmp` and then rename over the target, so
/// a crash mid-write never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on
    /// first save, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the document for a logical store name.
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn read_error(name: &str, source: std::io::Error) -> StoreError {
        StoreError::Read {
            name: name.to_string(),
            source,
        }
    }

    fn write_error(name: &str, source: std::io::Error) -> StoreError {
        StoreError::Write {
            name: name.to_string(),
            source,
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.document_path(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(store = name, path = %path.display(), "store document absent, starting empty");
                return Ok(T::default());
            }
            Err(e) => return Err(Self::read_error(name, e)),
        };
        serde_json::from_str(&contents).map_err(|e| StoreError::Decode {
            name: name.to_string(),
            source: e,
        })
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::write_error(name, e))?;

        let contents = serde_json::to_string_pretty(value).map_err(|e| StoreError::Encode {
            name: name.to_string(),
            source: e,
        })?;

        let path = self.document_path(name);
        let tmp = tmp_path(&path);
        std::fs::write(&tmp, contents).map_err(|e| Self::write_error(name, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Self::write_error(name, e))?;
        debug!(store = name, path = %path.display(), "store document saved");
        Ok(())
    }
}

/// Sibling temp path for the atomic rename.
fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
