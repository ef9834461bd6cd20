//! Best-run tracking, persisted alongside the agent's progress.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Result, error::Error, ports::ProgressStore};

/// Fastest cleared run seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScore {
    /// Milliseconds.
    pub time: f64,
    pub score: u32,
    pub episode: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    best: Option<HighScore>,
}

impl Scoreboard {
    pub const STORAGE_KEY: &'static str = "high_scores";

    /// Load from `store`; anything unreadable counts as no record.
    pub fn load(store: &dyn ProgressStore) -> Self {
        match store.load(Self::STORAGE_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|error| {
                warn!(%error, "discarding unreadable high scores");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(error) => {
                warn!(%error, "failed to load high scores");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn ProgressStore) -> Result<()> {
        let value = serde_json::to_value(self).map_err(|e| Error::SerializationContext {
            operation: "serialize high scores".to_string(),
            message: e.to_string(),
        })?;
        store.save(Self::STORAGE_KEY, &value)
    }

    pub fn best(&self) -> Option<&HighScore> {
        self.best.as_ref()
    }

    /// Record a cleared run. Returns `true` when it beats the previous best.
    pub fn record(&mut self, candidate: HighScore) -> bool {
        let improved = self.best.is_none_or(|best| candidate.time < best.time);
        if improved {
            self.best = Some(candidate);
        }
        improved
    }
}
