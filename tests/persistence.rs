//! Saving and restoring agent progress through the store port.

mod common;

use std::sync::Arc;

use pillar_agent::{
    AgentConfig, Error, InMemoryStore, JsonFileStore, Position, ProgressStore, QAgent, Result,
    StateKey, types::Action,
};
use serde_json::{Value, json};
use tempfile::TempDir;

use common::{ring, seeded_agent};

const KEY: &str = AgentConfig::DEFAULT_STORAGE_KEY;

/// Store whose medium is always unavailable.
struct FailingStore;

impl ProgressStore for FailingStore {
    fn save(&self, _key: &str, _value: &Value) -> Result<()> {
        Err(Error::Io {
            operation: "write progress".to_string(),
            source: std::io::Error::other("disk full"),
        })
    }

    fn load(&self, _key: &str) -> Result<Option<Value>> {
        Err(Error::Io {
            operation: "read progress".to_string(),
            source: std::io::Error::other("device unavailable"),
        })
    }
}

#[test]
fn test_roundtrip_through_store() {
    let store = InMemoryStore::new();
    store
        .save(
            KEY,
            &json!({
                "qTable": [["0,0:none", [["up", 1.5], ["none", 0.0]]]],
                "metrics": [],
                "episodeCount": 3
            }),
        )
        .unwrap();

    let agent = QAgent::new(AgentConfig::default(), Arc::new(store.clone())).unwrap();
    agent.save_progress().unwrap();

    let reloaded = QAgent::new(AgentConfig::default(), Arc::new(store)).unwrap();
    let key = StateKey::new("0,0:none");
    let row = reloaded.q_table().row(&key).expect("row restored");
    assert_eq!(row.len(), 2);
    assert_eq!(row.get(&Action::Up), Some(&1.5));
    assert_eq!(row.get(&Action::Stay), Some(&0.0));
    assert_eq!(reloaded.episode_count(), 3);
}

#[test]
fn test_complete_episode_always_flushes() {
    let (mut agent, store) = seeded_agent(AgentConfig::default());
    let targets = ring();
    let here = Position::ORIGIN;
    let there = here.stepped(Action::Left, 0.5);

    agent.learn(&here, Action::Left, 2.0, &there, &targets);
    assert!(!store.contains(KEY), "first flush waits for the cadence");

    agent.complete_episode(false, std::time::Duration::from_millis(16));
    let saved = store.load(KEY).unwrap().expect("flushed on completion");
    assert_eq!(saved["episodeCount"], 1);
    assert_eq!(saved["metrics"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_learn_flushes_on_cadence() {
    let (mut agent, store) = seeded_agent(AgentConfig::default().with_flush_interval(3));
    let here = Position::ORIGIN;

    agent.learn(&here, Action::Stay, -1.0, &here, &[]);
    agent.learn(&here, Action::Stay, -1.0, &here, &[]);
    assert!(!store.contains(KEY));

    agent.learn(&here, Action::Stay, -1.0, &here, &[]);
    assert!(store.contains(KEY));
}

#[test]
fn test_corrupt_payloads_start_cold() {
    let cases = [
        "not json at all",
        r#"{"qTable": "oops"}"#,
        r#"{"qTable": [["0,0:none", [["jump", 1.0]]]], "metrics": [], "episodeCount": 1}"#,
        r#"{"version": 99, "qTable": [], "metrics": [], "episodeCount": 1}"#,
    ];

    for text in cases {
        let store = InMemoryStore::new();
        store.insert_raw(KEY, text);

        let agent = QAgent::new(AgentConfig::default(), Arc::new(store))
            .unwrap_or_else(|e| panic!("load of {text:?} should not fail: {e}"));
        assert!(agent.q_table().is_empty(), "{text:?}");
        assert_eq!(agent.episode_count(), 0, "{text:?}");
    }
}

#[test]
fn test_json_file_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = AgentConfig::default().with_seed(1);
    let targets = ring();
    let here = Position::ORIGIN;
    let there = here.stepped(Action::Up, 0.5);

    {
        let store = Arc::new(JsonFileStore::new(dir.path()));
        let mut agent = QAgent::new(config.clone(), store).unwrap();
        agent.learn(&here, Action::Up, 4.0, &there, &targets);
        agent.complete_episode(true, std::time::Duration::from_millis(250));
    }

    let agent = QAgent::new(config, Arc::new(JsonFileStore::new(dir.path()))).unwrap();
    let key = agent.encode_state(&here, &targets);
    assert!((agent.q_table().get(&key, Action::Up) - 0.4).abs() < 1e-12);
    assert_eq!(agent.episode_count(), 1);
    let metrics = agent.performance_metrics().unwrap();
    assert_eq!(metrics.success_rate, 1.0);
    assert!((metrics.average_time - 250.0).abs() < 1e-9);
}

#[test]
fn test_custom_storage_key_is_isolated() {
    let store = InMemoryStore::new();
    let config = AgentConfig::default().with_storage_key("run-b");

    let mut agent = QAgent::new(config, Arc::new(store.clone())).unwrap();
    agent.complete_episode(false, std::time::Duration::ZERO);

    assert!(store.contains("run-b"));
    assert!(!store.contains(KEY));
}

#[test]
fn test_unavailable_store_does_not_stop_learning() {
    let config = AgentConfig::default().with_seed(3).with_flush_interval(1);
    let mut agent = QAgent::new(config, Arc::new(FailingStore)).expect("load errors start cold");
    assert!(agent.q_table().is_empty());

    let targets = ring();
    let here = Position::ORIGIN;
    let there = here.stepped(Action::Right, 0.5);
    for _ in 0..3 {
        agent.learn(&here, Action::Right, 2.0, &there, &targets);
    }
    agent.complete_episode(false, std::time::Duration::from_millis(30));
    agent.learn(&here, Action::Down, -1.0, &there, &targets);
    agent.complete_episode(true, std::time::Duration::from_millis(60));

    let key = agent.encode_state(&here, &targets);
    assert!(agent.q_table().get(&key, Action::Right) > 0.0);
    assert!(agent.q_table().get(&key, Action::Down) < 0.0);
    assert_eq!(agent.learn_calls(), 4);
    assert_eq!(agent.episode_count(), 2);
    assert_eq!(agent.history().len(), 2);
    assert!(agent.save_progress().is_err());
}
