//! Tabular Q-learning for the pillar-seeking task
//!
//! Each tick the agent encodes the world into a coarse [`StateKey`], picks an
//! action ε-greedily from its value table, and after the host applies the
//! action it performs one temporal-difference update:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use std::{sync::Arc, time::Duration};
//!
//! use pillar_agent::{
//!     adapters::InMemoryStore,
//!     app::AgentConfig,
//!     q_learning::QAgent,
//!     reward::reward,
//!     types::Position,
//! };
//!
//! let store = Arc::new(InMemoryStore::new());
//! let mut agent = QAgent::new(AgentConfig::default().with_seed(7), store)?;
//! let targets = vec![Position::new(4.0, 0.75, 0.0)];
//!
//! let here = Position::ORIGIN;
//! let action = agent.choose_action(&here, &targets);
//! let there = here.stepped(action, 0.5);
//! agent.learn(&here, action, reward(&there, &here, &targets), &there, &targets);
//! agent.complete_episode(false, Duration::from_millis(16));
//!
//! assert_eq!(agent.performance_metrics().unwrap().episode_count, 1);
//! # Ok::<(), pillar_agent::Error>(())
//! ```
//!
//! [`StateKey`]: crate::identifiers::StateKey

pub mod agent;
pub mod exploration;
pub mod metrics;
pub mod q_table;
pub mod serialization;
pub mod state;

// Public re-exports
pub use agent::{QAgent, SharedStore};
pub use exploration::ExplorationSchedule;
pub use metrics::{EpisodeMetrics, MetricsHistory, PerformanceMetrics};
pub use q_table::QTable;
pub use serialization::SavedProgress;
pub use state::encode;
