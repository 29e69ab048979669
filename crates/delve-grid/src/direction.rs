//! Cardinal directions and single-cell steps.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::GridPos;

/// One of the four cardinal directions.
///
/// Serialized in lowercase (`"up"`, `"down"`, `"left"`, `"right"`) to match
/// the action payloads produced by front ends and bots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward `y - 1`
    Up,
    /// Toward `y + 1`
    Down,
    /// Toward `x - 1`
    Left,
    /// Toward `x + 1`
    Right,
}

impl Direction {
    /// All directions in BFS neighbor order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// The cell offset for one step in this direction.
    #[must_use]
    pub const fn delta(self) -> GridPos {
        match self {
            Self::Up => GridPos::new(0, -1),
            Self::Down => GridPos::new(0, 1),
            Self::Left => GridPos::new(-1, 0),
            Self::Right => GridPos::new(1, 0),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The direction whose delta equals `delta`, if it is a unit cardinal step.
    #[must_use]
    pub fn from_delta(delta: GridPos) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// One step from `from` toward `to`, moving along the sign of each axis
/// independently. Diagonal steps are allowed; equal positions yield `from`.
#[must_use]
pub fn step_toward(from: GridPos, to: GridPos) -> GridPos {
    from + (to - from).signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_unit_steps() {
        for dir in Direction::ALL {
            let d = dir.delta();
            assert_eq!(d.x.abs() + d.y.abs(), 1);
            assert_eq!(d + dir.opposite().delta(), GridPos::ZERO);
            assert_eq!(Direction::from_delta(d), Some(dir));
        }
        assert_eq!(Direction::from_delta(GridPos::new(1, 1)), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Right).unwrap();
        assert_eq!(json, "\"right\"");
        let back: Direction = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(back, Direction::Up);
    }

    #[test]
    fn step_toward_moves_per_axis() {
        let from = GridPos::new(18, 15);
        assert_eq!(step_toward(from, GridPos::new(15, 15)), GridPos::new(17, 15));
        assert_eq!(step_toward(from, GridPos::new(20, 10)), GridPos::new(19, 14));
        assert_eq!(step_toward(from, from), from);
    }
}
