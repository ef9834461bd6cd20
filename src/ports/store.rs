//! Store port for cross-session persistence of agent progress.
//!
//! This module defines the trait boundary between the learning core and
//! whatever key/value medium holds its snapshots.

use serde_json::Value;

use crate::Result;

/// Port for saving and loading JSON payloads by string key.
///
/// The agent treats every error from this trait as recoverable: failures are
/// logged and learning continues on the in-memory table.
///
/// # Examples
///
/// ```
/// use pillar_agent::adapters::InMemoryStore;
/// use pillar_agent::ports::ProgressStore;
/// use serde_json::json;
///
/// let store = InMemoryStore::new();
/// store.save("scores", &json!({"best": 12.5}))?;
/// assert_eq!(store.load("scores")?, Some(json!({"best": 12.5})));
/// assert_eq!(store.load("missing")?, None);
/// # Ok::<(), pillar_agent::Error>(())
/// ```
pub trait ProgressStore {
    /// Persist `value` under `key`, replacing any previous payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized or written.
    fn save(&self, key: &str, value: &Value) -> Result<()>;

    /// Fetch the payload stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read or the stored bytes are
    /// not valid JSON.
    fn load(&self, key: &str) -> Result<Option<Value>>;
}
