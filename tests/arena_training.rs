//! Headless training runs of the Q-agent in the default arena.

mod common;

use std::sync::{Arc, Mutex};

use pillar_agent::{
    AgentConfig, App, EpisodeReport, Observer, Result, TickOutcome,
    pipeline::{MetricsObserver, TrainingConfig, TrainingPipeline},
};

use common::seeded_agent;

/// Shares what it sees with the test after the pipeline takes ownership.
#[derive(Clone, Default)]
struct Recorder {
    reports: Arc<Mutex<Vec<EpisodeReport>>>,
    ticks: Arc<Mutex<u64>>,
}

impl Observer for Recorder {
    fn on_step(&mut self, _episode: usize, _outcome: &TickOutcome) -> Result<()> {
        *self.ticks.lock().unwrap() += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, report: &EpisodeReport) -> Result<()> {
        self.reports.lock().unwrap().push(*report);
        Ok(())
    }

    fn wants_steps(&self) -> bool {
        true
    }
}

fn short_run(episodes: usize) -> TrainingConfig {
    TrainingConfig {
        episodes,
        max_steps: 300,
        ..TrainingConfig::default()
    }
}

#[test]
fn test_pipeline_reports_every_episode() {
    let (mut agent, _) = seeded_agent(AgentConfig::default());
    let recorder = Recorder::default();
    let mut pipeline = TrainingPipeline::new(short_run(5))
        .with_observer(Box::new(recorder.clone()))
        .with_observer(Box::new(MetricsObserver::new()));

    let result = pipeline.run(&mut agent).unwrap();

    let reports = recorder.reports.lock().unwrap();
    assert_eq!(result.total_episodes, 5);
    assert_eq!(reports.len(), 5);
    assert_eq!(agent.episode_count(), 5);
    assert_eq!(agent.history().len(), 5);

    let total_steps: u64 = reports.iter().map(|r| r.steps).sum();
    assert_eq!(*recorder.ticks.lock().unwrap(), total_steps);
    assert_eq!(agent.learn_calls(), total_steps);
    for report in reports.iter() {
        assert!(report.steps <= 300);
        assert_eq!(report.score as usize, report.pillars_destroyed * 100);
        assert_eq!(report.success, report.pillars_destroyed == 8);
    }
}

#[test]
fn test_same_seed_same_run() {
    let run = || {
        let app = App::for_testing().with_default_seed(9).build();
        let mut agent = app.create_agent(AgentConfig::default()).unwrap();
        let result = TrainingPipeline::new(short_run(3)).run(&mut agent).unwrap();
        (result, agent.q_table().to_entries())
    };

    let (first, first_table) = run();
    let (second, second_table) = run();
    assert_eq!(first, second);
    assert_eq!(first_table, second_table);
}

#[test]
fn test_training_fills_the_table_and_persists() {
    let app = App::for_testing().with_default_seed(3).build();
    let mut agent = app.create_agent(AgentConfig::default()).unwrap();

    TrainingPipeline::new(short_run(4)).run(&mut agent).unwrap();
    assert!(!agent.q_table().is_empty());

    let restored = app.create_agent(AgentConfig::default()).unwrap();
    assert_eq!(restored.episode_count(), 4);
    assert_eq!(restored.q_table().state_count(), agent.q_table().state_count());
    for (state, values) in agent.q_table().iter() {
        for (&action, &value) in values {
            let reloaded = restored.q_table().get(state, action);
            assert!((reloaded - value).abs() < 1e-12, "{state} {action}");
        }
    }
}
