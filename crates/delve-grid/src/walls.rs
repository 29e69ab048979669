//! Impassable cells.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::GridPos;

/// A set of wall cells.
///
/// Membership checks go through a `HashSet`; listing goes through a `Vec`
/// kept in insertion order so snapshots and serialized output are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GridPos>", into = "Vec<GridPos>")]
pub struct WallSet {
    ordered: Vec<GridPos>,
    lookup: HashSet<GridPos>,
}

impl WallSet {
    /// Creates an empty wall set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wall. Returns false if the cell was already a wall.
    pub fn insert(&mut self, pos: GridPos) -> bool {
        if self.lookup.insert(pos) {
            self.ordered.push(pos);
            true
        } else {
            false
        }
    }

    /// True if `pos` is a wall.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        self.lookup.contains(&pos)
    }

    /// Walls in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[GridPos] {
        &self.ordered
    }

    /// Number of walls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True if there are no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl From<Vec<GridPos>> for WallSet {
    fn from(cells: Vec<GridPos>) -> Self {
        cells.into_iter().collect()
    }
}

impl From<WallSet> for Vec<GridPos> {
    fn from(walls: WallSet) -> Self {
        walls.ordered
    }
}

impl FromIterator<GridPos> for WallSet {
    fn from_iter<I: IntoIterator<Item = GridPos>>(iter: I) -> Self {
        let mut walls = Self::new();
        for pos in iter {
            walls.insert(pos);
        }
        walls
    }
}
