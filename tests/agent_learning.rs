//! Learning behavior of the Q-agent observed through its public API.

mod common;

use std::time::Duration;

use pillar_agent::{
    AgentConfig, Position, StateKey,
    q_learning::{ExplorationSchedule, MetricsHistory, encode},
    reward::reward,
    types::Action,
};

use common::{ring, seeded_agent};

#[test]
fn test_unseen_state_reads_zero() {
    let (agent, _) = seeded_agent(AgentConfig::default());
    let key = agent.encode_state(&Position::new(1.0, 0.0, -1.5), &ring());

    for action in Action::ALL {
        assert_eq!(agent.q_table().get(&key, action), 0.0);
    }
    assert!(agent.q_table().is_empty(), "reads must not create entries");
}

#[test]
fn test_single_state_update_converges() {
    // Staying put at the origin with no targets keeps the agent in "0,0:none".
    let (mut agent, _) = seeded_agent(AgentConfig::default().with_flush_interval(10_000));
    let here = Position::ORIGIN;
    let reward = 1.0;

    for _ in 0..5_000 {
        agent.learn(&here, Action::Stay, reward, &here, &[]);
    }

    let expected = reward / (1.0 - agent.config().discount_factor);
    let value = agent.q_table().get(&StateKey::new("0,0:none"), Action::Stay);
    assert!(
        (value - expected).abs() < 1e-3,
        "expected ~{expected}, got {value}"
    );
}

#[test]
fn test_exploration_never_drops_below_floor() {
    let schedule = ExplorationSchedule::default();
    for episodes in [0, 500, 999, 1_000, 10_000, u64::MAX] {
        let rate = schedule.rate(episodes);
        assert!(rate >= schedule.floor, "episodes={episodes} rate={rate}");
        assert!(rate <= schedule.base);
    }
    assert!((schedule.rate(0) - 0.1).abs() < 1e-12);
    assert!((schedule.rate(500) - 0.05).abs() < 1e-12);
    assert!((schedule.rate(1_000_000) - 0.01).abs() < 1e-12);
}

#[test]
fn test_exploration_rate_tracks_completed_episodes() {
    let (mut agent, _) = seeded_agent(AgentConfig::default().with_exploration(0.2, 0.05, 10));
    assert!((agent.exploration_rate() - 0.2).abs() < 1e-12);

    for _ in 0..5 {
        agent.complete_episode(false, Duration::from_millis(10));
    }
    assert!((agent.exploration_rate() - 0.1).abs() < 1e-12);

    for _ in 0..20 {
        agent.complete_episode(false, Duration::from_millis(10));
    }
    assert!((agent.exploration_rate() - 0.05).abs() < 1e-12);
}

#[test]
fn test_history_keeps_most_recent_hundred() {
    let (mut agent, _) = seeded_agent(AgentConfig::default());

    for i in 0..MetricsHistory::DEFAULT_CAPACITY {
        agent.complete_episode(false, Duration::from_millis(i as u64));
        assert_eq!(agent.history().len(), i + 1);
    }

    agent.complete_episode(true, Duration::from_millis(1_000));
    assert_eq!(agent.history().len(), MetricsHistory::DEFAULT_CAPACITY);
    assert_eq!(agent.episode_count(), 101);

    let oldest = agent.history().iter().next().unwrap();
    assert!((oldest.completion_time - 1.0).abs() < 1e-9, "episode 0 evicted");
    let newest = agent.history().latest().unwrap();
    assert!(newest.success);
    assert!((newest.completion_time - 1_000.0).abs() < 1e-9);
}

#[test]
fn test_episode_accumulator_resets_after_completion() {
    let (mut agent, _) = seeded_agent(AgentConfig::default());
    let targets = ring();
    let here = Position::ORIGIN;
    let there = here.stepped(Action::Right, 0.5);

    agent.learn(&here, Action::Right, 1.0, &there, &targets);
    agent.learn(&there, Action::Left, -0.5, &here, &targets);
    agent.record_target_reached();
    assert_eq!(agent.current_episode().episode_steps, 2);

    agent.complete_episode(false, Duration::from_millis(40));
    let finished = agent.history().latest().unwrap();
    assert_eq!(finished.episode_steps, 2);
    assert_eq!(finished.pillars_destroyed, 1);
    assert!((finished.episode_reward - 0.5).abs() < 1e-12);

    assert_eq!(agent.current_episode().episode_steps, 0);
    assert_eq!(agent.current_episode().pillars_destroyed, 0);
}

#[test]
fn test_stationary_step_gets_only_stall_penalty() {
    let targets = ring();
    let r = reward(&Position::ORIGIN, &Position::ORIGIN, &targets);
    assert!((r - (-0.05 - 2.0)).abs() < 1e-12);
}

#[test]
fn test_equidistant_targets_resolve_to_first() {
    let here = Position::ORIGIN;
    let east = Position::new(2.0, 0.75, 0.0);
    let west = Position::new(-2.0, 0.75, 0.0);

    assert_eq!(encode(&here, &[east, west]).as_str(), "0,0:2,0");
    assert_eq!(encode(&here, &[west, east]).as_str(), "0,0:-2,0");
}

#[test]
fn test_greedy_choice_follows_learned_value() {
    // A floor of zero is rejected; keep exploration tiny and the horizon short.
    let config = AgentConfig::default().with_exploration(0.001, 0.001, 1);
    let (mut agent, _) = seeded_agent(config);
    let targets = ring();
    let here = Position::ORIGIN;
    let there = here.stepped(Action::Down, 0.5);

    for _ in 0..20 {
        agent.learn(&here, Action::Down, 5.0, &there, &targets);
    }

    let greedy = (0..200)
        .map(|_| agent.choose_action(&here, &targets))
        .filter(|&a| a == Action::Down)
        .count();
    assert!(greedy >= 195, "picked Down only {greedy}/200 times");
}
