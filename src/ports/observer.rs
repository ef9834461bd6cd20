//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing headless training runs,
//! allowing composable data collection without coupling the training loop
//! to specific output formats or metrics.

use crate::{
    Result,
    arena::{EpisodeReport, TickOutcome},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - In-memory metrics for tests and summaries
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(episode, outcome)` - For each tick of the arena
///    - `on_episode_end(episode, report)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use pillar_agent::{arena::EpisodeReport, ports::Observer};
///
/// struct SuccessCounter {
///     successes: usize,
/// }
///
/// impl Observer for SuccessCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         report: &EpisodeReport,
///     ) -> pillar_agent::Result<()> {
///         self.successes += usize::from(report.success);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called before the first tick of an episode.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every arena tick, once the learning update has run.
    fn on_step(&mut self, _episode: usize, _outcome: &TickOutcome) -> Result<()> {
        Ok(())
    }

    /// Called after the agent has recorded the finished episode.
    fn on_episode_end(&mut self, _episode: usize, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether this observer wants per-step events.
    ///
    /// Returning `false` lets the pipeline skip the `on_step` fan-out.
    fn wants_steps(&self) -> bool {
        false
    }
}
