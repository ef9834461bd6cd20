//! Application layer with dependency injection container.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  App (DI container)                  │
//! │    owns SharedStore, default seed    │
//! └──────────────┬───────────────────────┘
//!                │ builds
//!                ▼
//! ┌──────────────────────────────────────┐
//! │  QAgent                              │
//! │    QTable, MetricsHistory, ε schedule│
//! └──────────────┬───────────────────────┘
//!                │ persists through
//!                ▼
//! ┌──────────────────────────────────────┐
//! │  ProgressStore port                  │
//! │    JsonFileStore / InMemoryStore     │
//! └──────────────────────────────────────┘
//! ```

pub mod config;
pub mod container;

pub use config::AgentConfig;
pub use container::{App, AppBuilder};
