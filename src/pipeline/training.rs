//! Training pipeline: repeated arena episodes against one learner

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    arena::{Arena, ArenaConfig, EpisodeReport},
    ports::{Learner, Observer},
    reward::RewardConfig,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// Tick budget per episode before it counts as a failure
    pub max_steps: u64,

    pub arena: ArenaConfig,

    pub rewards: RewardConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 200,
            max_steps: 2_000,
            arena: ArenaConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

/// Fastest cleared episode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FastestClear {
    /// 0-based index within the run
    pub episode: usize,
    pub time_ms: f64,
    pub steps: u64,
    pub score: u32,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub average_reward: f64,
    pub average_steps: f64,
    pub average_pillars: f64,
    pub fastest_clear: Option<FastestClear>,
}

impl TrainingResult {
    /// Aggregate a list of episode reports
    pub fn from_reports(reports: &[EpisodeReport]) -> Self {
        fn mean(reports: &[EpisodeReport], f: impl Fn(&EpisodeReport) -> f64) -> f64 {
            if reports.is_empty() {
                0.0
            } else {
                reports.iter().map(f).sum::<f64>() / reports.len() as f64
            }
        }

        let total_episodes = reports.len();

        let successes = reports.iter().filter(|r| r.success).count();
        let fastest_clear = reports
            .iter()
            .enumerate()
            .filter(|(_, r)| r.success)
            .min_by(|(_, a), (_, b)| a.elapsed_ms.total_cmp(&b.elapsed_ms))
            .map(|(episode, r)| FastestClear {
                episode,
                time_ms: r.elapsed_ms,
                steps: r.steps,
                score: r.score,
            });

        Self {
            total_episodes,
            successes,
            success_rate: mean(reports, |r| f64::from(u8::from(r.success))),
            average_reward: mean(reports, |r| r.total_reward),
            average_steps: mean(reports, |r| r.steps as f64),
            average_pillars: mean(reports, |r| r.pillars_destroyed as f64),
            fastest_clear,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Training pipeline for a single learner in the arena
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run `config.episodes` episodes, notifying observers along the way.
    pub fn run(&mut self, learner: &mut dyn Learner) -> Result<TrainingResult> {
        let mut arena = Arena::new(self.config.arena, self.config.rewards)?;
        let episodes = self.config.episodes;
        let max_steps = self.config.max_steps;
        let wants_steps = self.observers.iter().any(|o| o.wants_steps());

        info!(learner = learner.name(), episodes, max_steps, "training started");
        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut reports = Vec::with_capacity(episodes);
        for episode in 0..episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let observers = &mut self.observers;
            let report = arena.run_episode_with(&mut *learner, max_steps, |outcome| {
                if wants_steps {
                    for observer in observers.iter_mut().filter(|o| o.wants_steps()) {
                        observer.on_step(episode, outcome)?;
                    }
                }
                Ok(())
            })?;

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &report)?;
            }
            reports.push(report);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_reports(&reports);
        info!(
            episodes = result.total_episodes,
            successes = result.successes,
            average_reward = result.average_reward,
            "training finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(success: bool, elapsed_ms: f64, reward: f64) -> EpisodeReport {
        EpisodeReport {
            success,
            steps: 10,
            pillars_destroyed: if success { 8 } else { 3 },
            score: if success { 800 } else { 300 },
            total_reward: reward,
            elapsed_ms,
        }
    }

    #[test]
    fn test_result_from_reports() {
        let reports = [
            report(false, 900.0, -10.0),
            report(true, 700.0, 30.0),
            report(true, 500.0, 40.0),
            report(false, 100.0, 0.0),
        ];
        let result = TrainingResult::from_reports(&reports);
        assert_eq!(result.total_episodes, 4);
        assert_eq!(result.successes, 2);
        assert_eq!(result.success_rate, 0.5);
        assert_eq!(result.average_reward, 15.0);
        assert_eq!(result.average_pillars, 5.5);

        let fastest = result.fastest_clear.unwrap();
        assert_eq!(fastest.episode, 2);
        assert_eq!(fastest.time_ms, 500.0);
    }

    #[test]
    fn test_empty_result() {
        let result = TrainingResult::from_reports(&[]);
        assert_eq!(result.total_episodes, 0);
        assert_eq!(result.success_rate, 0.0);
        assert!(result.fastest_clear.is_none());
    }
}
