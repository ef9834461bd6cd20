//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    arena::{EpisodeReport, TickOutcome},
    ports::Observer,
};

/// Complete observation of a training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub episode: usize,
    pub report: EpisodeReport,
    /// Present only when step recording is on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TickOutcome>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    cleared: usize,
    pillars: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            cleared: 0,
            pillars: 0,
        }
    }

    fn message(&self) -> String {
        format!("cleared {} | pillars {}", self.cleared, self.pillars)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        self.cleared += usize::from(report.success);
        self.pillars += report.pillars_destroyed;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Keeps every episode report in memory
#[derive(Default)]
pub struct MetricsObserver {
    reports: Vec<EpisodeReport>,
    steps_seen: u64,
    track_steps: bool,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Also count individual ticks.
    pub fn with_step_tracking(mut self) -> Self {
        self.track_steps = true;
        self
    }

    pub fn reports(&self) -> &[EpisodeReport] {
        &self.reports
    }

    pub fn steps_seen(&self) -> u64 {
        self.steps_seen
    }
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _episode: usize, _outcome: &TickOutcome) -> Result<()> {
        self.steps_seen += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, report: &EpisodeReport) -> Result<()> {
        self.reports.push(*report);
        Ok(())
    }

    fn wants_steps(&self) -> bool {
        self.track_steps
    }
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    include_steps: bool,
    current_steps: Vec<TickOutcome>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            include_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Write every tick of each episode alongside its report.
    pub fn with_steps(mut self) -> Self {
        self.include_steps = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, outcome: &TickOutcome) -> Result<()> {
        self.current_steps.push(*outcome);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        let observation = Observation {
            episode,
            report: *report,
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    fn wants_steps(&self) -> bool {
        self.include_steps
    }
}
