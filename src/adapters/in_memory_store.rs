//! In-memory progress store for testing.
//!
//! This adapter keeps serialized JSON text in a shared map, so payloads go
//! through a real encode/decode cycle without touching the file system.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde_json::Value;

use crate::{Result, error::Error, ports::ProgressStore};

/// In-memory store for testing.
///
/// # Examples
///
/// ```
/// use pillar_agent::adapters::InMemoryStore;
/// use pillar_agent::ports::ProgressStore;
/// use serde_json::json;
///
/// let store = InMemoryStore::new();
/// store.save("qagent_progress", &json!({"episodeCount": 3}))?;
/// assert!(store.contains("qagent_progress"));
/// # Ok::<(), pillar_agent::Error>(())
/// ```
///
/// # Thread Safety
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    storage: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of keys currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.storage().contains_key(key)
    }

    /// Store raw text under `key`, bypassing serialization.
    ///
    /// Lets tests plant truncated or foreign payloads.
    pub fn insert_raw(&self, key: &str, text: impl Into<String>) {
        self.storage().insert(key.to_string(), text.into());
    }

    /// Raw text stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.storage().get(key).cloned()
    }
}

impl ProgressStore for InMemoryStore {
    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value).map_err(|e| Error::SerializationContext {
            operation: format!("serialize '{key}' for in-memory storage"),
            message: e.to_string(),
        })?;
        self.storage().insert(key.to_string(), text);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Value>> {
        let Some(text) = self.raw(key) else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| Error::SerializationContext {
                operation: format!("deserialize '{key}' from in-memory storage"),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_in_memory_save_and_load() {
        let store = InMemoryStore::new();
        assert_eq!(store.count(), 0);
        assert!(!store.contains("k"));

        store.save("k", &json!([1, 2, 3])).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.load("k").unwrap(), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_load_missing_is_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.load("nothing").unwrap(), None);
    }

    #[test]
    fn test_corrupt_text_is_an_error() {
        let store = InMemoryStore::new();
        store.insert_raw("k", "{\"qTable\": [");
        assert!(store.load("k").is_err());
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = InMemoryStore::new();
        let b = a.clone();
        a.save("shared", &json!({"x": 1})).unwrap();
        assert_eq!(b.load("shared").unwrap(), Some(json!({"x": 1})));

        b.clear();
        assert_eq!(a.count(), 0);
    }
}
