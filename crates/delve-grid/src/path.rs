//! Breadth-first pathfinding on the grid.
//!
//! Neighbors are expanded in [`Direction::ALL`] order, so ties between equally
//! short paths always resolve the same way.

use std::collections::{HashMap, VecDeque};

use crate::{Bounds, Direction, GridPos};

/// Shortest 4-connected path from `start` to `goal`.
///
/// The returned path excludes `start` and ends at `goal`. Cells for which
/// `is_blocked` returns true are never entered, except `goal` itself, which is
/// always considered enterable (a bot pathing to a monster targets the
/// monster's cell).
///
/// Returns `Some(vec![])` when `start == goal` and `None` when the goal is
/// unreachable or out of bounds.
pub fn bfs_path(
    bounds: Bounds,
    start: GridPos,
    goal: GridPos,
    is_blocked: impl Fn(GridPos) -> bool,
) -> Option<Vec<GridPos>> {
    if !bounds.contains(goal) {
        return None;
    }
    if start == goal {
        return Some(Vec::new());
    }

    let mut parents: HashMap<GridPos, GridPos> = HashMap::new();
    let mut frontier = VecDeque::from([start]);

    while let Some(current) = frontier.pop_front() {
        for dir in Direction::ALL {
            let next = current + dir.delta();
            if next == start || parents.contains_key(&next) || !bounds.contains(next) {
                continue;
            }
            if next != goal && is_blocked(next) {
                continue;
            }
            parents.insert(next, current);
            if next == goal {
                return Some(unwind(&parents, start, goal));
            }
            frontier.push_back(next);
        }
    }

    None
}

fn unwind(parents: &HashMap<GridPos, GridPos>, start: GridPos, goal: GridPos) -> Vec<GridPos> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(&prev) = parents.get(&cursor) {
        if prev == start {
            break;
        }
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WallSet;
    use proptest::prelude::*;

    #[test]
    fn straight_line_path() {
        let bounds = Bounds::new(10, 10);
        let path = bfs_path(bounds, GridPos::new(1, 1), GridPos::new(4, 1), |_| false).unwrap();
        assert_eq!(
            path,
            vec![GridPos::new(2, 1), GridPos::new(3, 1), GridPos::new(4, 1)]
        );
    }

    #[test]
    fn routes_around_walls() {
        let bounds = Bounds::new(5, 5);
        let walls: WallSet = (0..4).map(|y| GridPos::new(2, y)).collect();
        let path = bfs_path(bounds, GridPos::new(0, 0), GridPos::new(4, 0), |p| walls.contains(p))
            .unwrap();
        assert!(path.iter().all(|p| !walls.contains(*p)));
        assert!(path.contains(&GridPos::new(2, 4)));
        assert_eq!(path.last(), Some(&GridPos::new(4, 0)));
    }

    #[test]
    fn goal_cell_is_enterable_even_if_blocked() {
        let bounds = Bounds::new(5, 5);
        let goal = GridPos::new(3, 0);
        let path = bfs_path(bounds, GridPos::new(2, 0), goal, |p| p == goal).unwrap();
        assert_eq!(path, vec![goal]);
    }

    #[test]
    fn unreachable_goal_returns_none() {
        let bounds = Bounds::new(5, 5);
        let walls: WallSet = (0..5).map(|y| GridPos::new(2, y)).collect();
        assert!(
            bfs_path(bounds, GridPos::new(0, 0), GridPos::new(4, 4), |p| walls.contains(p))
                .is_none()
        );
        assert!(bfs_path(bounds, GridPos::new(0, 0), GridPos::new(9, 9), |_| false).is_none());
    }

    #[test]
    fn start_equals_goal_is_empty_path() {
        let bounds = Bounds::new(3, 3);
        let p = GridPos::new(1, 1);
        assert_eq!(bfs_path(bounds, p, p, |_| false), Some(Vec::new()));
    }

    proptest! {
        #[test]
        fn open_grid_path_length_is_manhattan(
            sx in 0i32..12, sy in 0i32..12, gx in 0i32..12, gy in 0i32..12,
        ) {
            let bounds = Bounds::new(12, 12);
            let start = GridPos::new(sx, sy);
            let goal = GridPos::new(gx, gy);
            let path = bfs_path(bounds, start, goal, |_| false).unwrap();
            let manhattan = (sx - gx).abs() + (sy - gy).abs();
            prop_assert_eq!(path.len(), usize::try_from(manhattan).unwrap());
        }
    }
}
