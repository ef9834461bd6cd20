//! Dependency injection container for the pillar agent.
//!
//! The container owns the persistence store and hands it to every agent it
//! builds, so production code and tests differ only in which store they
//! inject.

use std::{path::PathBuf, sync::Arc};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::{InMemoryStore, JsonFileStore},
    ports::ProgressStore,
    q_learning::{QAgent, SharedStore},
    scoreboard::Scoreboard,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use pillar_agent::app::{AgentConfig, App};
///
/// let app = App::new();
/// let agent = app.create_agent(AgentConfig::default().with_seed(42))?;
/// # Ok::<(), pillar_agent::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use pillar_agent::adapters::InMemoryStore;
/// use pillar_agent::app::{AgentConfig, App};
///
/// let app = App::for_testing()
///     .with_store(InMemoryStore::new())
///     .with_default_seed(42)
///     .build();
/// let agent = app.create_agent(AgentConfig::default())?;
/// assert_eq!(agent.episode_count(), 0);
/// # Ok::<(), pillar_agent::Error>(())
/// ```
pub struct App {
    /// Store for agent progress and high scores
    store: SharedStore,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Directory used by [`App::new`].
    pub const DEFAULT_STORE_DIR: &'static str = ".pillar-agent";

    /// Create a new app with production defaults.
    ///
    /// Uses a [`JsonFileStore`] under [`App::DEFAULT_STORE_DIR`] and no
    /// default seed.
    pub fn new() -> Self {
        Self::with_store_dir(Self::DEFAULT_STORE_DIR)
    }

    /// Production app persisting under `dir`.
    pub fn with_store_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: Arc::new(JsonFileStore::new(dir)),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the store.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Create an agent, restoring whatever progress the store holds under
    /// `config.storage_key`.
    ///
    /// The config's seed wins over the container default.
    pub fn create_agent(&self, mut config: AgentConfig) -> Result<QAgent> {
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        QAgent::new(config, self.store())
    }

    /// Persist the agent's current table, history and episode count.
    pub fn save_agent(&self, agent: &QAgent) -> Result<()> {
        agent.save_progress()
    }

    pub fn load_scoreboard(&self) -> Scoreboard {
        Scoreboard::load(self.store.as_ref())
    }

    pub fn save_scoreboard(&self, scoreboard: &Scoreboard) -> Result<()> {
        scoreboard.save(self.store.as_ref())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
pub struct AppBuilder {
    store: Option<SharedStore>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            store: None,
            default_seed: None,
        }
    }

    /// Set a custom store.
    pub fn with_store<S>(mut self, store: S) -> Self
    where
        S: ProgressStore + Send + Sync + 'static,
    {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a default random seed for all agents created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no store was specified, uses an in-memory store so tests never
    /// touch the file system by accident.
    pub fn build(self) -> App {
        App {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryStore::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::types::{Action, Position};

    #[test]
    fn test_app_creates_agent() {
        let app = App::for_testing().build();
        let agent = app.create_agent(AgentConfig::default());
        assert!(agent.is_ok());
    }

    #[test]
    fn test_app_rejects_invalid_config() {
        let app = App::for_testing().build();
        let result = app.create_agent(AgentConfig::default().with_learning_rate(2.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_agents_share_progress_through_store() {
        let store = InMemoryStore::new();
        let app = App::for_testing().with_store(store.clone()).build();

        let mut agent = app.create_agent(AgentConfig::default().with_seed(1)).unwrap();
        agent.learn(
            &Position::ORIGIN,
            Action::Right,
            1.0,
            &Position::new(0.5, 0.0, 0.0),
            &[],
        );
        agent.complete_episode(true, Duration::from_secs(1));

        let restored = app.create_agent(AgentConfig::default()).unwrap();
        assert_eq!(restored.episode_count(), 1);
        assert_eq!(restored.q_table().size(), 1);
    }

    #[test]
    fn test_config_seed_overrides_app_default() {
        let app = App::for_testing().with_default_seed(42).build();
        let agent = app.create_agent(AgentConfig::default().with_seed(7)).unwrap();
        assert_eq!(agent.config().seed, Some(7));

        let agent = app.create_agent(AgentConfig::default()).unwrap();
        assert_eq!(agent.config().seed, Some(42));
    }
}
