//! ε schedule for ε-greedy action selection.

use serde::{Deserialize, Serialize};

/// Linear decay from `base` toward `floor` over `decay_horizon` episodes.
///
/// The rate is a pure function of the completed-episode count, so two agents
/// with the same history always explore at the same rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationSchedule {
    pub base: f64,
    pub floor: f64,
    pub decay_horizon: u64,
}

impl ExplorationSchedule {
    pub const fn new(base: f64, floor: f64, decay_horizon: u64) -> Self {
        Self {
            base,
            floor,
            decay_horizon,
        }
    }

    /// `max(floor, base * (1 - episodes / horizon))`
    pub fn rate(&self, episodes: u64) -> f64 {
        if self.decay_horizon == 0 {
            return self.floor;
        }
        let progress = episodes as f64 / self.decay_horizon as f64;
        (self.base * (1.0 - progress)).max(self.floor)
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self::new(0.1, 0.01, 1000)
    }
}
