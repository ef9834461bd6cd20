//! Q-learning agent
//!
//! Owns the value table, the ε-greedy policy, episode bookkeeping and
//! persistence. The host loop drives it one tick at a time through
//! [`QAgent::choose_action`] and [`QAgent::learn`].

use std::{fmt, sync::Arc, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    Result,
    app::AgentConfig,
    identifiers::StateKey,
    ports::{Learner, ProgressStore},
    q_learning::{
        metrics::{EpisodeMetrics, MetricsHistory, PerformanceMetrics},
        q_table::QTable,
        serialization::SavedProgress,
        state,
    },
    types::{Action, Position},
};

/// Shared handle to the persistence medium.
pub type SharedStore = Arc<dyn ProgressStore + Send + Sync>;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent (off-policy TD control).
///
/// Generic over its random source so tests can script exploration.
pub struct QAgent<R = StdRng> {
    config: AgentConfig,
    q_table: QTable,
    history: MetricsHistory,
    episode_count: u64,
    current: EpisodeMetrics,
    learn_calls: u64,
    store: SharedStore,
    rng: R,
}

impl QAgent<StdRng> {
    /// Create an agent and restore any progress saved under
    /// `config.storage_key`.
    ///
    /// Uses `config.seed` for the random source when present.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` is out of
    /// range. Storage problems are never returned; they only cause a cold
    /// start.
    pub fn new(config: AgentConfig, store: SharedStore) -> Result<Self> {
        let rng = build_rng(config.seed);
        Self::with_rng(config, store, rng)
    }
}

impl<R: Rng> QAgent<R> {
    /// Create an agent that draws randomness from `rng`, restoring any
    /// progress the store holds under `config.storage_key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` fails
    /// [`AgentConfig::validate`]. Unreadable or malformed stored progress is
    /// logged and the agent starts cold instead.
    pub fn with_rng(config: AgentConfig, store: SharedStore, rng: R) -> Result<Self> {
        config.validate()?;

        let mut agent = Self {
            q_table: QTable::new(config.learning_rate, config.discount_factor),
            history: MetricsHistory::new(config.history_capacity),
            episode_count: 0,
            current: EpisodeMetrics::default(),
            learn_calls: 0,
            store,
            rng,
            config,
        };
        agent.load_progress();
        Ok(agent)
    }

    /// Exploration rate for the next action, derived from the episode count.
    pub fn exploration_rate(&self) -> f64 {
        self.config.exploration.rate(self.episode_count)
    }

    /// Table key for `position` given the remaining `targets`.
    pub fn encode_state(&self, position: &Position, targets: &[Position]) -> StateKey {
        state::encode(position, targets)
    }

    /// ε-greedy action selection.
    ///
    /// Explores with a uniformly random action with probability
    /// [`Self::exploration_rate`]; otherwise takes the greedy action for the
    /// encoded state. Never writes to the table.
    pub fn choose_action(&mut self, position: &Position, targets: &[Position]) -> Action {
        let epsilon = self.exploration_rate();
        if self.rng.random::<f64>() < epsilon {
            // Explore: random action
            Action::ALL[self.rng.random_range(0..Action::ALL.len())]
        } else {
            // Exploit: greedy action based on Q-values
            let key = state::encode(position, targets);
            self.q_table.greedy_action(&key)
        }
    }

    /// One temporal-difference update for `old --action--> new`.
    ///
    /// Both positions are encoded against the same `targets`. Also feeds the
    /// running episode accumulator and flushes progress every
    /// `flush_interval` calls.
    pub fn learn(
        &mut self,
        old: &Position,
        action: Action,
        reward: f64,
        new: &Position,
        targets: &[Position],
    ) {
        let old_key = state::encode(old, targets);
        let new_key = state::encode(new, targets);

        self.current.record_step(reward);
        self.q_table
            .q_learning_update(old_key, action, reward, &new_key);

        self.learn_calls += 1;
        if self.learn_calls.is_multiple_of(self.config.flush_interval) {
            debug!(learn_calls = self.learn_calls, "periodic progress flush");
            self.flush();
        }
    }

    /// Count one destroyed target against the running episode.
    pub fn record_target_reached(&mut self) {
        self.current.pillars_destroyed += 1;
    }

    /// Close the running episode and start a fresh one.
    ///
    /// Appends the finished episode to the bounded history, bumps the
    /// episode counter and always flushes.
    pub fn complete_episode(&mut self, success: bool, elapsed: Duration) {
        let finished = std::mem::take(&mut self.current).finalize(success, elapsed);
        self.history.push(finished);
        self.episode_count += 1;

        info!(
            episode = self.episode_count,
            success,
            reward = finished.episode_reward,
            steps = finished.episode_steps,
            pillars = finished.pillars_destroyed,
            elapsed_ms = finished.completion_time,
            "episode complete"
        );

        self.flush();
    }

    /// Averages over the most recent episodes, or `None` before the first
    /// episode completes.
    pub fn performance_metrics(&self) -> Option<PerformanceMetrics> {
        self.history.summarize(
            self.config.metrics_window,
            self.episode_count,
            self.exploration_rate(),
        )
    }

    /// Write the current table, history and episode count to the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error. The in-memory state is unaffected.
    pub fn save_progress(&self) -> Result<()> {
        let snapshot = SavedProgress::new(&self.q_table, self.history.to_vec(), self.episode_count);
        let value = snapshot.to_value()?;
        self.store.save(&self.config.storage_key, &value)
    }

    fn flush(&self) {
        if let Err(error) = self.save_progress() {
            warn!(
                key = %self.config.storage_key,
                %error,
                "failed to persist agent progress; continuing with in-memory table"
            );
        }
    }

    fn load_progress(&mut self) {
        let key = self.config.storage_key.as_str();
        let value = match self.store.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(key, "no saved progress; starting cold");
                return;
            }
            Err(error) => {
                warn!(key, %error, "failed to load agent progress; starting cold");
                return;
            }
        };

        let saved = match SavedProgress::from_value(key, value) {
            Ok(saved) => saved,
            Err(error) => {
                warn!(key, %error, "discarding unreadable agent progress; starting cold");
                return;
            }
        };

        self.q_table = saved.to_table(self.config.learning_rate, self.config.discount_factor);
        self.history = MetricsHistory::from_entries(saved.metrics, self.config.history_capacity);
        self.episode_count = saved.episode_count;

        info!(
            key,
            states = self.q_table.state_count(),
            values = self.q_table.size(),
            episodes = self.episode_count,
            "restored agent progress"
        );
    }

    /// Forget everything learned, in memory only. Call
    /// [`Self::save_progress`] to overwrite the stored snapshot.
    pub fn reset(&mut self) {
        self.q_table.reset();
        self.history = MetricsHistory::new(self.config.history_capacity);
        self.episode_count = 0;
        self.current = EpisodeMetrics::default();
        self.learn_calls = 0;
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    /// Accumulator for the episode in progress.
    pub fn current_episode(&self) -> &EpisodeMetrics {
        &self.current
    }

    pub fn learn_calls(&self) -> u64 {
        self.learn_calls
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

impl<R> fmt::Debug for QAgent<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QAgent")
            .field("config", &self.config)
            .field("states", &self.q_table.state_count())
            .field("episode_count", &self.episode_count)
            .field("current", &self.current)
            .field("learn_calls", &self.learn_calls)
            .finish_non_exhaustive()
    }
}

impl<R: Rng> Learner for QAgent<R> {
    fn choose_action(&mut self, position: &Position, targets: &[Position]) -> Action {
        QAgent::choose_action(self, position, targets)
    }

    fn learn(
        &mut self,
        old: &Position,
        action: Action,
        reward: f64,
        new: &Position,
        targets: &[Position],
    ) {
        QAgent::learn(self, old, action, reward, new, targets);
    }

    fn record_target_reached(&mut self) {
        QAgent::record_target_reached(self);
    }

    fn complete_episode(&mut self, success: bool, elapsed: Duration) {
        QAgent::complete_episode(self, success, elapsed);
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}
