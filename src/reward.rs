//! Reward shaping for the pillar-seeking task.
//!
//! Every step costs a little. Standing still costs a lot and short-circuits
//! the rest of the shaping. Otherwise the agent is paid for closing distance
//! on the nearest pillar and charged for opening it, with the magnitude
//! growing as it gets closer. Reaching a pillar replaces all of that with a
//! large fixed bonus.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    q_learning::state::nearest_distance,
    types::Position,
};

/// Tunable reward constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Added every step (negative).
    pub step_reward: f64,
    /// Subtracted when the agent did not move.
    pub stall_penalty: f64,
    /// Planar displacement below this counts as not moving.
    pub stall_epsilon: f64,
    /// Numerator of the proximity term `scale / distance`.
    pub proximity_scale: f64,
    /// Smallest magnitude of a proximity adjustment.
    pub proximity_min: f64,
    /// Largest magnitude of a proximity adjustment.
    pub proximity_cap: f64,
    /// Distances below this are clamped before dividing.
    pub min_distance: f64,
    /// Paid instead of the shaped reward when a pillar is reached.
    pub collision_bonus: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_reward: -0.05,
            stall_penalty: 2.0,
            stall_epsilon: 0.01,
            proximity_scale: 10.0,
            proximity_min: 1.0,
            proximity_cap: 20.0,
            min_distance: 0.1,
            collision_bonus: 50.0,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.step_reward,
            self.stall_penalty,
            self.stall_epsilon,
            self.proximity_scale,
            self.proximity_min,
            self.proximity_cap,
            self.min_distance,
            self.collision_bonus,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidConfiguration {
                message: "reward constants must be finite".to_string(),
            });
        }
        if self.min_distance <= 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("min_distance must be positive, got {}", self.min_distance),
            });
        }
        if self.proximity_min > self.proximity_cap {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "proximity_min ({}) exceeds proximity_cap ({})",
                    self.proximity_min, self.proximity_cap
                ),
            });
        }
        Ok(())
    }

    /// Magnitude of the proximity adjustment at `distance`.
    pub fn proximity(&self, distance: f64) -> f64 {
        let divisor = distance.max(self.min_distance);
        (self.proximity_scale / divisor).clamp(self.proximity_min, self.proximity_cap)
    }

    /// Shaped reward for moving from `previous` to `next`.
    ///
    /// `targets` is the list of pillars still standing before the move.
    pub fn reward(&self, next: &Position, previous: &Position, targets: &[Position]) -> f64 {
        let mut reward = self.step_reward;

        if next.planar_distance(previous) < self.stall_epsilon {
            return reward - self.stall_penalty;
        }

        let (Some(now), Some(before)) = (
            nearest_distance(next, targets),
            nearest_distance(previous, targets),
        ) else {
            return reward;
        };

        if now < before {
            reward += self.proximity(now);
        } else if now > before {
            reward -= self.proximity(now);
        }
        reward
    }
}

/// [`RewardConfig::reward`] with default constants.
pub fn reward(next: &Position, previous: &Position, targets: &[Position]) -> f64 {
    RewardConfig::default().reward(next, previous, targets)
}
