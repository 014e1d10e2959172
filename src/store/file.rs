//! File-backed key-value store
//!
//! A single JSON document on disk holding every key. Each setter rewrites
//! the whole document synchronously before returning, so the on-disk state
//! is always the last completed write.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{Result, SignpostError};

use super::KeyValueStore;

/// Durable [`KeyValueStore`] persisted as a JSON object.
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading any existing document.
    ///
    /// A missing file is an empty store; it is created on first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                SignpostError::Store(format!("corrupt store file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(SignpostError::Store(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), entries = values.len(), "store opened");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Insert and flush. The write happens under the map lock so concurrent
    /// setters serialize and the file matches the last completed write.
    fn set(&self, key: &str, value: Value) {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value);
        if let Err(e) = self.flush(&values) {
            warn!(key, error = %e, "store write failed, value held in memory only");
        }
    }

    fn flush(&self, values: &HashMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| SignpostError::Store(format!("mkdir failed: {e}")))?;
            }
        }
        let raw = serde_json::to_string_pretty(values)
            .map_err(|e| SignpostError::Store(format!("serialize failed: {e}")))?;
        fs::write(&self.path, raw)
            .map_err(|e| SignpostError::Store(format!("write {} failed: {e}", self.path.display())))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_string))
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn get_i64(&self, key: &str) -> i64 {
        self.get(key).and_then(|v| v.as_i64()).unwrap_or(0)
    }

    fn set_string(&self, key: &str, value: &str) {
        self.set(key, Value::from(value));
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set(key, Value::from(value));
    }

    fn set_i64(&self, key: &str, value: i64) {
        self.set(key, Value::from(value));
    }
}
