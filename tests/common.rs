//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use pillar_agent::{
    AgentConfig, InMemoryStore, Position, QAgent,
    arena::pillar_ring,
};

/// Default pillar layout: eight pillars on a ring of radius 4.
pub fn ring() -> Vec<Position> {
    pillar_ring(8, 4.0, 0.75)
}

/// Seeded agent over a fresh in-memory store, plus a handle on that store.
pub fn seeded_agent(config: AgentConfig) -> (QAgent, InMemoryStore) {
    let store = InMemoryStore::new();
    let agent = QAgent::new(config.with_seed(42), Arc::new(store.clone()))
        .expect("default-based configs are valid");
    (agent, store)
}
