//! Core world types: planar positions and the fixed action set.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A point in world space.
///
/// Motion is planar on the x/z axes; `y` is carried through untouched so
/// callers that render the agent keep their vertical offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance on the x/z plane, ignoring height.
    pub fn planar_distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Move by `step` units along the action's axis.
    pub fn stepped(&self, action: Action, step: f64) -> Self {
        let (dx, dz) = action.delta();
        Self::new(self.x + dx * step, self.y, self.z + dz * step)
    }

    /// Clamp x and z into `[-half_extent, half_extent]`.
    pub fn clamped(&self, half_extent: f64) -> Self {
        Self::new(
            self.x.clamp(-half_extent, half_extent),
            self.y,
            self.z.clamp(-half_extent, half_extent),
        )
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Position> for [f64; 3] {
    fn from(pos: Position) -> Self {
        [pos.x, pos.y, pos.z]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// One of the five moves available to the agent.
///
/// The declaration order is the greedy tie-break order, so `Stay` only wins
/// a tie when every other action shares its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    #[serde(rename = "none")]
    Stay,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Stay,
    ];

    /// Unit displacement on the (x, z) plane. Up points toward -z.
    pub const fn delta(self) -> (f64, f64) {
        match self {
            Action::Up => (0.0, -1.0),
            Action::Down => (0.0, 1.0),
            Action::Left => (-1.0, 0.0),
            Action::Right => (1.0, 0.0),
            Action::Stay => (0.0, 0.0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Stay => "none",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Action::Up),
            "down" => Ok(Action::Down),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            "none" | "stay" => Ok(Action::Stay),
            other => Err(Error::UnknownAction {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Position::new(0.0, 10.0, 0.0);
        let b = Position::new(3.0, -2.0, 4.0);
        assert_eq!(a.planar_distance(&b), 5.0);
    }

    #[test]
    fn test_stepped_and_clamped() {
        let p = Position::new(3.8, 0.75, 0.0).stepped(Action::Right, 0.5);
        assert!((p.x - 4.3).abs() < 1e-12);
        let clamped = p.clamped(4.0);
        assert_eq!(clamped.x, 4.0);
        assert_eq!(clamped.y, 0.75);

        let up = Position::ORIGIN.stepped(Action::Up, 0.5);
        assert_eq!(up.z, -0.5);
    }

    #[test]
    fn test_action_names_roundtrip_through_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!("jump".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Action::Stay).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&Action::Left).unwrap(), "\"left\"");
    }
}
