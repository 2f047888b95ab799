//! Breadth-first search: grid-step metric, early termination on found targets
//! (spec §4.8).

use std::collections::VecDeque;

use crate::bound::CellHashMap;
use crate::cell::{Cell, CellPath, Step};
use crate::error::SylvesResult;
use crate::grid::Grid;

use super::reconstruct_path;

/// The outcome of [`bfs`]: per-cell distance (grid-step count) and the step that
/// reached it, from which any reached cell's path back to `source` can be
/// reconstructed.
#[derive(Clone, Debug, Default)]
pub struct BfsResult {
    source: Cell,
    distance: CellHashMap<i32>,
    came_from: CellHashMap<Step>,
}

impl BfsResult {
    pub fn distance(&self, cell: Cell) -> Option<i32> {
        if cell == self.source {
            Some(0)
        } else {
            self.distance.get(&cell).copied()
        }
    }

    pub fn path_to(&self, cell: Cell) -> Option<CellPath> {
        if cell == self.source {
            return Some(CellPath::empty());
        }
        self.distance.get(&cell)?;
        Some(reconstruct_path(&self.came_from, cell))
    }
}

/// Breadth-first search from `source` (spec §4.8). `targets`, when given, enables
/// early termination as soon as every target has been reached. `max_distance`
/// bounds how many grid-steps are explored.
pub fn bfs(
    grid: &Grid,
    source: Cell,
    targets: Option<&[Cell]>,
    max_distance: Option<i32>,
    is_accessible: &(dyn Fn(Cell) -> bool + Sync),
    step_length: &(dyn Fn(Step) -> f32 + Sync),
) -> SylvesResult<BfsResult> {
    let mut distance: CellHashMap<i32> = Default::default();
    let mut came_from: CellHashMap<Step> = Default::default();
    let mut remaining_targets: std::collections::HashSet<Cell> =
        targets.map(|t| t.iter().copied().collect()).unwrap_or_default();

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(cell) = queue.pop_front() {
        let d = distance.get(&cell).copied().unwrap_or(0);

        remaining_targets.remove(&cell);
        if targets.is_some() && remaining_targets.is_empty() && cell != source {
            break;
        }

        let next_d = d + 1;
        if let Some(max) = max_distance {
            if next_d > max {
                continue;
            }
        }

        for dir in grid.get_cell_dirs(cell)? {
            let Some((dest, inverse_dir, connection)) = grid.try_move(cell, dir)? else {
                continue;
            };
            if distance.contains_key(&dest) || dest == source {
                continue;
            }
            if !is_accessible(dest) {
                continue;
            }
            let step = Step {
                src: cell,
                dest,
                dir,
                inverse_dir,
                connection,
                length: 1.0,
            };
            if step_length(step) < 0.0 {
                continue;
            }
            distance.insert(dest, next_d);
            came_from.insert(dest, step);
            queue.push_back(dest);
        }
    }

    Ok(BfsResult { source, distance, came_from })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::Bound;
    use crate::grid::SquareGrid;

    /// Scenario 3: BFS distance from (0,0,0) to (3,4,0) on an unbounded square grid
    /// is 7 (Manhattan distance), via a 7-step path.
    #[test]
    fn scenario_3_square_bfs_distance() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((-10, -10), (10, 10)));
        let source = Cell::new2(0, 0);
        let target = Cell::new2(3, 4);
        let result = bfs(&grid, source, Some(&[target]), None, &super::super::always_accessible, &super::super::unit_step_length).unwrap();
        assert_eq!(result.distance(target), Some(7));
        let path = result.path_to(target).unwrap();
        assert_eq!(path.steps.len(), 7);
        assert!(path.is_well_formed());
        assert_eq!(path.source(), Some(source));
        assert_eq!(path.target(), Some(target));
    }

    #[test]
    fn max_distance_bounds_exploration() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((-10, -10), (10, 10)));
        let result = bfs(&grid, Cell::new2(0, 0), None, Some(2), &super::super::always_accessible, &super::super::unit_step_length).unwrap();
        assert_eq!(result.distance(Cell::new2(2, 0)), Some(2));
        assert_eq!(result.distance(Cell::new2(3, 0)), None);
    }
}
