//! Configuration types for agent creation.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    q_learning::{exploration::ExplorationSchedule, metrics::MetricsHistory},
};

/// Configuration for creating a Q-learning agent.
///
/// Builder-style; every field has a default matching the browser game.
///
/// # Examples
///
/// ```
/// use pillar_agent::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_seed(42)
///     .with_learning_rate(0.2)
///     .with_exploration(0.3, 0.02, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// ε schedule
    pub exploration: ExplorationSchedule,
    /// Persist every this many `learn` calls
    pub flush_interval: u64,
    /// Finished episodes kept in the metrics history
    pub history_capacity: usize,
    /// Episodes averaged by `performance_metrics`
    pub metrics_window: usize,
    /// Store key for the snapshot
    pub storage_key: String,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub const DEFAULT_STORAGE_KEY: &'static str = "qagent_progress";

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set base rate, floor and decay horizon of the ε schedule.
    pub fn with_exploration(mut self, base: f64, floor: f64, decay_horizon: u64) -> Self {
        self.exploration = ExplorationSchedule::new(base, floor, decay_horizon);
        self
    }

    pub fn with_flush_interval(mut self, steps: u64) -> Self {
        self.flush_interval = steps;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration {
                    message: format!("{name} must be within [0, 1], got {value}"),
                })
            }
        };

        unit("learning_rate", self.learning_rate)?;
        unit("discount_factor", self.discount_factor)?;
        unit("exploration base", self.exploration.base)?;
        unit("exploration floor", self.exploration.floor)?;

        if self.discount_factor >= 1.0 {
            return Err(Error::InvalidConfiguration {
                message: "discount_factor must be below 1 for values to stay bounded".to_string(),
            });
        }
        if self.exploration.floor <= 0.0 {
            return Err(Error::InvalidConfiguration {
                message: "exploration floor must be positive".to_string(),
            });
        }
        if self.exploration.floor > self.exploration.base {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "exploration floor ({}) exceeds base rate ({})",
                    self.exploration.floor, self.exploration.base
                ),
            });
        }
        if self.flush_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "flush_interval must be at least 1".to_string(),
            });
        }
        if self.history_capacity == 0 || self.metrics_window == 0 {
            return Err(Error::InvalidConfiguration {
                message: "history_capacity and metrics_window must be at least 1".to_string(),
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "storage_key must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration: ExplorationSchedule::default(),
            flush_interval: 100,
            history_capacity: MetricsHistory::DEFAULT_CAPACITY,
            metrics_window: 10,
            storage_key: Self::DEFAULT_STORAGE_KEY.to_string(),
            seed: None,
        }
    }
}
