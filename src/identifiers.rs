//! Identifier types for value-table rows.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Discretized world description used to index the value table.
///
/// Rendered as `"<x>,<z>:<tx>,<tz>"`, or `"<x>,<z>:none"` once every target
/// is gone. Built by [`crate::q_learning::state::encode`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Suffix used when no targets remain.
    pub const NO_TARGET: &'static str = "none";

    /// Wrap an already-formatted key.
    ///
    /// # Examples
    ///
    /// ```
    /// use pillar_agent::identifiers::StateKey;
    ///
    /// let key = StateKey::new("0,0:none");
    /// assert_eq!(key.as_str(), "0,0:none");
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StateKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StateKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<&str> for StateKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let key = StateKey::new("1,2:none");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"1,2:none\"");
    }
}
