//! Serialization support for persisted agent progress.
//!
//! The snapshot layout matches what the browser game wrote to local storage:
//!
//! ```json
//! {
//!   "qTable": [["0,0:4,0", [["up", 1.25], ["none", -0.3]]]],
//!   "metrics": [{"episodeReward": 12.0, "episodeSteps": 80, ...}],
//!   "episodeCount": 1
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Result,
    error::Error,
    identifiers::StateKey,
    q_learning::{metrics::EpisodeMetrics, q_table::QTable},
    types::Action,
};

/// One serialized table row.
pub type SavedRow = (StateKey, Vec<(Action, f64)>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    /// Absent in snapshots written before versioning.
    #[serde(default = "SavedProgress::legacy_version")]
    pub version: u32,
    pub q_table: Vec<SavedRow>,
    pub metrics: Vec<EpisodeMetrics>,
    pub episode_count: u64,
}

impl SavedProgress {
    pub const VERSION: u32 = 1;

    fn legacy_version() -> u32 {
        Self::VERSION
    }

    pub fn new(table: &QTable, metrics: Vec<EpisodeMetrics>, episode_count: u64) -> Self {
        Self {
            version: Self::VERSION,
            q_table: table.to_entries(),
            metrics,
            episode_count,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::SerializationContext {
            operation: "serialize agent progress".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode and validate a stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSnapshot`] when the payload has the wrong
    /// shape, names an unknown action, carries non-finite numbers, or was
    /// written by a newer format version.
    pub fn from_value(key: &str, value: Value) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedSnapshot {
            key: key.to_string(),
            reason,
        };

        let saved: SavedProgress =
            serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

        if saved.version > Self::VERSION {
            return Err(malformed(format!(
                "unsupported format version {} (expected at most {})",
                saved.version,
                Self::VERSION
            )));
        }

        for (state, values) in &saved.q_table {
            if let Some((action, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
                return Err(malformed(format!(
                    "non-finite value {value} for ({state}, {action})"
                )));
            }
        }

        let bad_metric = saved
            .metrics
            .iter()
            .any(|m| !m.episode_reward.is_finite() || !m.completion_time.is_finite());
        if bad_metric {
            return Err(malformed("non-finite episode metrics".to_string()));
        }

        Ok(saved)
    }

    /// Rebuild a table with the given hyperparameters from this snapshot.
    pub fn to_table(&self, learning_rate: f64, discount_factor: f64) -> QTable {
        let mut table = QTable::new(learning_rate, discount_factor);
        table.load_entries(self.q_table.iter().cloned());
        table
    }
}
