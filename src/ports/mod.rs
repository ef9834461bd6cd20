//! Ports (trait boundaries) for external dependencies.
//!
//! The agent and the arena only talk to persistence, learners, and
//! training observers through these traits. Concrete implementations live
//! in [`crate::adapters`] and [`crate::pipeline`].

pub mod learner;
pub mod observer;
pub mod store;

pub use learner::Learner;
pub use observer::Observer;
pub use store::ProgressStore;
