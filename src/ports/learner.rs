//! Learner port - the contract the game loop drives every tick
//!
//! The arena (or any other host loop) only needs to ask for an action,
//! report the transition that followed, and mark episode boundaries. Keeping
//! that behind a trait lets the loop run against scripted learners in tests.

use std::time::Duration;

use crate::types::{Action, Position};

/// Per-tick decision and learning interface.
///
/// # Call Sequence
///
/// Every tick:
/// 1. `choose_action(position, targets)`
/// 2. the host applies the action and computes a reward
/// 3. `learn(old, action, reward, new, targets)`
/// 4. `record_target_reached()` if the step destroyed a target
///
/// And once per episode: `complete_episode(success, elapsed)`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use pillar_agent::{
///     ports::Learner,
///     types::{Action, Position},
/// };
///
/// /// Always walks right; learns nothing.
/// struct Rightward;
///
/// impl Learner for Rightward {
///     fn choose_action(&mut self, _position: &Position, _targets: &[Position]) -> Action {
///         Action::Right
///     }
///
///     fn learn(&mut self, _: &Position, _: Action, _: f64, _: &Position, _: &[Position]) {}
///
///     fn complete_episode(&mut self, _success: bool, _elapsed: Duration) {}
///
///     fn name(&self) -> &str {
///         "rightward"
///     }
/// }
/// ```
pub trait Learner {
    /// Pick the action for the current tick.
    fn choose_action(&mut self, position: &Position, targets: &[Position]) -> Action;

    /// Apply one learning update for the transition `old --action--> new`.
    ///
    /// `targets` is the target list as it stood when the action was chosen.
    fn learn(
        &mut self,
        old: &Position,
        action: Action,
        reward: f64,
        new: &Position,
        targets: &[Position],
    );

    /// Note that the current episode destroyed one more target.
    fn record_target_reached(&mut self) {}

    /// Close the running episode.
    fn complete_episode(&mut self, success: bool, elapsed: Duration);

    /// Name used in logs and summaries.
    fn name(&self) -> &str;
}
