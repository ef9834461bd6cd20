//! Per-episode bookkeeping and rolling performance summaries.

use std::{collections::VecDeque, time::Duration};

use serde::{Deserialize, Serialize};

/// Aggregates for one episode.
///
/// Field names follow the persisted layout (`episodeReward`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeMetrics {
    pub episode_reward: f64,
    pub episode_steps: u64,
    pub pillars_destroyed: u32,
    /// Milliseconds from episode start to completion.
    pub completion_time: f64,
    /// Older saves carry no flag; treat them as unsuccessful.
    #[serde(default)]
    pub success: bool,
}

impl EpisodeMetrics {
    pub fn record_step(&mut self, reward: f64) {
        self.episode_reward += reward;
        self.episode_steps += 1;
    }

    pub fn finalize(mut self, success: bool, elapsed: Duration) -> Self {
        self.success = success;
        self.completion_time = elapsed.as_secs_f64() * 1000.0;
        self
    }
}

/// Bounded FIFO of finished episodes; the oldest entry is evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsHistory {
    entries: VecDeque<EpisodeMetrics>,
    capacity: usize,
}

impl MetricsHistory {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build from persisted entries, keeping only the newest `capacity`.
    pub fn from_entries(
        entries: impl IntoIterator<Item = EpisodeMetrics>,
        capacity: usize,
    ) -> Self {
        let mut history = Self::new(capacity);
        for entry in entries {
            history.push(entry);
        }
        history
    }

    pub fn push(&mut self, entry: EpisodeMetrics) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EpisodeMetrics> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&EpisodeMetrics> {
        self.entries.back()
    }

    pub fn to_vec(&self) -> Vec<EpisodeMetrics> {
        self.entries.iter().copied().collect()
    }

    /// Summarize the newest `window` episodes. `None` when empty.
    pub fn summarize(
        &self,
        window: usize,
        episode_count: u64,
        epsilon: f64,
    ) -> Option<PerformanceMetrics> {
        let take = window.min(self.entries.len());
        if take == 0 {
            return None;
        }

        let recent = self.entries.iter().rev().take(take);
        let (mut reward, mut steps, mut time, mut successes) = (0.0, 0.0, 0.0, 0usize);
        for entry in recent {
            reward += entry.episode_reward;
            steps += entry.episode_steps as f64;
            time += entry.completion_time;
            successes += usize::from(entry.success);
        }
        let n = take as f64;

        Some(PerformanceMetrics {
            episode_count,
            average_reward: reward / n,
            average_steps: steps / n,
            average_time: time / n,
            success_rate: successes as f64 / n,
            epsilon,
        })
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Rolling averages over the most recent episodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub episode_count: u64,
    pub average_reward: f64,
    pub average_steps: f64,
    /// Milliseconds.
    pub average_time: f64,
    pub success_rate: f64,
    /// Exploration rate in effect for the next action.
    pub epsilon: f64,
}
