//! Headless pillar arena.
//!
//! Stands in for the rendered game: a square platform with a ring of pillars
//! around the origin. Every tick the learner picks an action, the agent
//! moves half a unit, the reward is computed and fed back, and any pillar
//! within reach is destroyed.

use std::{f64::consts::TAU, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    error::Error,
    ports::Learner,
    reward::RewardConfig,
    types::{Action, Position},
};

/// World constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub pillar_count: usize,
    /// Distance of each pillar from the origin.
    pub ring_radius: f64,
    pub pillar_height: f64,
    /// The platform spans `[-half_extent, half_extent]` on x and z.
    pub half_extent: f64,
    /// Units moved per non-idle action.
    pub speed: f64,
    pub agent_radius: f64,
    /// Extra reach beyond `agent_radius` that still counts as a hit.
    pub hit_margin: f64,
    /// Simulated frames per second; sets the elapsed time per tick.
    pub ticks_per_second: f64,
    pub points_per_pillar: u32,
    pub start: Position,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            pillar_count: 8,
            ring_radius: 4.0,
            pillar_height: 0.75,
            half_extent: 4.0,
            speed: 0.5,
            agent_radius: 0.75,
            hit_margin: 0.3,
            ticks_per_second: 60.0,
            points_per_pillar: 100,
            start: Position::ORIGIN,
        }
    }
}

impl ArenaConfig {
    pub const MIN_TICKS_PER_SECOND: f64 = 1.0;

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("ring_radius", self.ring_radius),
            ("half_extent", self.half_extent),
            ("speed", self.speed),
            ("ticks_per_second", self.ticks_per_second),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }
        if self.ticks_per_second < Self::MIN_TICKS_PER_SECOND {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "ticks_per_second must be at least {}, got {}",
                    Self::MIN_TICKS_PER_SECOND,
                    self.ticks_per_second
                ),
            });
        }
        if !(self.agent_radius >= 0.0 && self.hit_margin >= 0.0) {
            return Err(Error::InvalidConfiguration {
                message: "agent_radius and hit_margin must be non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// Planar distance under which a pillar is destroyed.
    pub fn reach(&self) -> f64 {
        self.agent_radius + self.hit_margin
    }
}

/// `count` pillars evenly spaced on a circle, starting on the +x axis.
pub fn pillar_ring(count: usize, radius: f64, height: f64) -> Vec<Position> {
    (0..count)
        .map(|i| {
            let angle = i as f64 / count as f64 * TAU;
            Position::new(angle.cos() * radius, height, angle.sin() * radius)
        })
        .collect()
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// 1-based step within the episode.
    pub step: u64,
    pub action: Action,
    pub from: Position,
    pub to: Position,
    pub reward: f64,
    /// Pillar destroyed this tick, if any.
    pub destroyed: Option<Position>,
    pub remaining: usize,
}

/// Summary of one finished episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub success: bool,
    pub steps: u64,
    pub pillars_destroyed: usize,
    pub score: u32,
    pub total_reward: f64,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Arena {
    config: ArenaConfig,
    rewards: RewardConfig,
    targets: Vec<Position>,
    position: Position,
    steps: u64,
    score: u32,
    total_reward: f64,
}

impl Arena {
    pub fn new(config: ArenaConfig, rewards: RewardConfig) -> Result<Self> {
        config.validate()?;
        rewards.validate()?;
        Ok(Self {
            targets: pillar_ring(config.pillar_count, config.ring_radius, config.pillar_height),
            position: config.start,
            steps: 0,
            score: 0,
            total_reward: 0.0,
            config,
            rewards,
        })
    }

    /// Restore every pillar and put the agent back at the start.
    pub fn reset(&mut self) {
        self.targets = pillar_ring(
            self.config.pillar_count,
            self.config.ring_radius,
            self.config.pillar_height,
        );
        self.position = self.config.start;
        self.steps = 0;
        self.score = 0;
        self.total_reward = 0.0;
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Pillars still standing, in ring order.
    pub fn targets(&self) -> &[Position] {
        &self.targets
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_cleared(&self) -> bool {
        self.targets.is_empty()
    }

    /// Simulated time since the last reset, saturating at [`Duration::MAX`].
    pub fn elapsed(&self) -> Duration {
        Duration::try_from_secs_f64(self.steps as f64 / self.config.ticks_per_second)
            .unwrap_or(Duration::MAX)
    }

    /// Advance one frame.
    ///
    /// Reaching a pillar pays the collision bonus in place of the shaped
    /// reward. The learner sees the target list from before the pillar is
    /// removed; at most one pillar falls per tick.
    pub fn tick<L: Learner + ?Sized>(&mut self, learner: &mut L) -> TickOutcome {
        let from = self.position;
        let action = learner.choose_action(&from, &self.targets);
        let to = from
            .stepped(action, self.config.speed)
            .clamped(self.config.half_extent);

        let reach = self.config.reach();
        let hit = self
            .targets
            .iter()
            .position(|target| to.planar_distance(target) < reach);

        let reward = match hit {
            Some(_) => self.rewards.collision_bonus,
            None => self.rewards.reward(&to, &from, &self.targets),
        };
        learner.learn(&from, action, reward, &to, &self.targets);

        self.position = to;
        self.steps += 1;
        self.total_reward += reward;

        let destroyed = hit.map(|idx| {
            let pillar = self.targets.remove(idx);
            self.score += self.config.points_per_pillar;
            learner.record_target_reached();
            debug!(step = self.steps, %pillar, remaining = self.targets.len(), "pillar destroyed");
            pillar
        });

        TickOutcome {
            step: self.steps,
            action,
            from,
            to,
            reward,
            destroyed,
            remaining: self.targets.len(),
        }
    }

    /// Reset, then tick until every pillar is down or `max_steps` ticks
    /// have run, and close the episode on the learner.
    pub fn run_episode<L: Learner + ?Sized>(
        &mut self,
        learner: &mut L,
        max_steps: u64,
    ) -> Result<EpisodeReport> {
        self.run_episode_with(learner, max_steps, |_| Ok(()))
    }

    /// [`Self::run_episode`] with a hook invoked after every tick.
    ///
    /// # Errors
    ///
    /// Stops at the first error from `on_step`. The learner's episode is
    /// still closed (as a failure) before the error is returned.
    pub fn run_episode_with<L, F>(
        &mut self,
        learner: &mut L,
        max_steps: u64,
        mut on_step: F,
    ) -> Result<EpisodeReport>
    where
        L: Learner + ?Sized,
        F: FnMut(&TickOutcome) -> Result<()>,
    {
        self.reset();
        let total = self.targets.len();

        while !self.is_cleared() && self.steps < max_steps {
            let outcome = self.tick(learner);
            if let Err(error) = on_step(&outcome) {
                learner.complete_episode(false, self.elapsed());
                return Err(error);
            }
        }

        let success = self.is_cleared();
        let elapsed = self.elapsed();
        learner.complete_episode(success, elapsed);

        Ok(EpisodeReport {
            success,
            steps: self.steps,
            pillars_destroyed: total - self.targets.len(),
            score: self.score,
            total_reward: self.total_reward,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        })
    }
}
