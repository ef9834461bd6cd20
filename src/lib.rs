//! Tabular Q-learning agent for the pillar arena
//!
//! An agent moves on the ground plane of a small square arena and learns to
//! seek out and destroy a ring of pillars. This crate provides:
//! - State encoding onto a half-unit grid keyed by the nearest pillar
//! - A tabular Q-learning agent with a decaying ε-greedy policy
//! - Reward shaping for progress, stalls, and pillar hits
//! - Episode bookkeeping, rolling metrics, and key/value persistence
//! - A headless arena simulation and a training pipeline with observers
//!
//! ```
//! use pillar_agent::{App, AgentConfig, Position};
//!
//! let app = App::for_testing().with_default_seed(7).build();
//! let mut agent = app.create_agent(AgentConfig::default()).unwrap();
//!
//! let targets = [Position::new(2.0, 0.75, 0.0)];
//! let action = agent.choose_action(&Position::ORIGIN, &targets);
//! let next = Position::ORIGIN.stepped(action, 0.5);
//! let reward = pillar_agent::reward(&next, &Position::ORIGIN, &targets);
//! agent.learn(&Position::ORIGIN, action, reward, &next, &targets);
//! assert_eq!(agent.current_episode().episode_steps, 1);
//! ```

pub mod adapters;
pub mod app;
pub mod arena;
pub mod cli;
pub mod error;
pub mod identifiers;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod reward;
pub mod scoreboard;
pub mod types;

pub use adapters::{InMemoryStore, JsonFileStore};
pub use app::{AgentConfig, App, AppBuilder};
pub use arena::{Arena, ArenaConfig, EpisodeReport, TickOutcome};
pub use error::{Error, Result};
pub use identifiers::StateKey;
pub use ports::{Learner, Observer, ProgressStore};
pub use q_learning::{
    EpisodeMetrics, ExplorationSchedule, PerformanceMetrics, QAgent, QTable, SavedProgress,
};
pub use reward::{RewardConfig, reward};
pub use scoreboard::{HighScore, Scoreboard};
pub use types::{Action, Position};
