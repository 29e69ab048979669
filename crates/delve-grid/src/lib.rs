//! # Delve Grid
//!
//! Tile-grid spatial substrate for the Delve dungeon crawler.
//!
//! The grid is a rectangle of integer cells addressed by [`GridPos`]. This
//! crate knows nothing about players or monsters; it provides the geometry
//! that the exploration engine and the playtest bots share:
//!
//! - **Bounds**: which cells exist, and where the center is
//! - **Directions**: the four cardinal moves and their deltas
//! - **Walls**: a set of impassable cells
//! - **Paths**: breadth-first shortest paths around blocked cells
//!
//! ## Quick Start
//!
//! ```
//! use delve_grid::{bfs_path, Bounds, Direction, GridPos, WallSet};
//!
//! let bounds = Bounds::new(10, 10);
//! let mut walls = WallSet::new();
//! walls.insert(GridPos::new(5, 4));
//!
//! let start = bounds.center();
//! assert_eq!(start, GridPos::new(5, 5));
//! assert_eq!(start + Direction::Up.delta(), GridPos::new(5, 4));
//!
//! let path = bfs_path(bounds, start, GridPos::new(5, 2), |p| walls.contains(p)).unwrap();
//! assert_eq!(path.last(), Some(&GridPos::new(5, 2)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod direction;
pub mod path;
pub mod walls;

pub use direction::{step_toward, Direction};
pub use path::bfs_path;
pub use walls::WallSet;

/// A cell coordinate on the grid. `x` grows to the right, `y` grows downward.
pub type GridPos = glam::IVec2;

/// Rectangular grid extent, anchored at `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Number of columns
    pub width: i32,
    /// Number of rows
    pub height: i32,
}

impl Bounds {
    /// Create bounds of the given size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True if the bounds contain at least one cell.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Check if a cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// The center cell, rounding toward the origin on even sizes.
    #[must_use]
    pub const fn center(&self) -> GridPos {
        GridPos::new(self.width / 2, self.height / 2)
    }

    /// Total number of cells.
    #[must_use]
    pub fn area(&self) -> usize {
        usize::try_from(self.width.max(0)).unwrap_or(0)
            * usize::try_from(self.height.max(0)).unwrap_or(0)
    }

    /// Iterate every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPos::new(x, y)))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(30, 30)
    }
}
