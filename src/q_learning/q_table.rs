//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::{identifiers::StateKey, types::Action};

/// One table row: estimated value per action for a single state.
pub type ActionValues = HashMap<Action, f64>;

/// Q-table mapping state keys to per-action value estimates.
///
/// Rows and cells are created lazily on write. Reads of anything missing
/// return 0 without materializing an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<StateKey, ActionValues>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Value reported for never-written state-action pairs.
    pub const DEFAULT_VALUE: f64 = 0.0;

    /// Create an empty Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            rows: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: Action) -> f64 {
        self.rows
            .get(state.as_str())
            .and_then(|row| row.get(&action))
            .copied()
            .unwrap_or(Self::DEFAULT_VALUE)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.rows.entry(state).or_default().insert(action, value);
    }

    /// Stored values for a state, if it has ever been written.
    pub fn row(&self, state: &StateKey) -> Option<&ActionValues> {
        self.rows.get(state.as_str())
    }

    /// Maximum Q-value over the full action set
    pub fn max_q(&self, state: &StateKey) -> f64 {
        Action::ALL
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value)
    ///
    /// Ties go to the action listed first in [`Action::ALL`].
    pub fn greedy_action(&self, state: &StateKey) -> Action {
        let mut best = Action::ALL[0];
        let mut best_value = self.get(state, best);
        for &action in &Action::ALL[1..] {
            let value = self.get(state, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the updated value.
    pub fn q_learning_update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
    ) -> f64 {
        let current_q = self.get(&state, action);
        let max_next_q = self.max_q(next_state);
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
        new_q
    }

    /// Drop every learned value.
    pub fn reset(&mut self) {
        self.rows.clear();
    }

    /// Number of states with at least one stored value
    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of Q-values stored
    pub fn size(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.rows.iter()
    }

    /// Flatten into `(state, [(action, value)])` pairs, sorted by state key
    /// and action order so repeated exports are byte-identical.
    pub fn to_entries(&self) -> Vec<(StateKey, Vec<(Action, f64)>)> {
        let mut entries: Vec<_> = self
            .rows
            .iter()
            .map(|(state, row)| {
                let mut values: Vec<_> = row.iter().map(|(&a, &v)| (a, v)).collect();
                values.sort_by_key(|(action, _)| *action);
                (state.clone(), values)
            })
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// Replace the table contents with `entries`. Later duplicates win.
    pub fn load_entries<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (StateKey, Vec<(Action, f64)>)>,
    {
        self.rows.clear();
        for (state, values) in entries {
            let row = self.rows.entry(state).or_default();
            row.extend(values);
        }
    }
}
