//! A*: min-heap keyed by `g + h`, requiring an admissible heuristic (spec §4.8).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::bound::CellHashMap;
use crate::cell::{Cell, CellPath, Step};
use crate::error::SylvesResult;
use crate::grid::Grid;

use super::reconstruct_path;

#[derive(Clone, Debug, PartialEq)]
struct HeapEntry {
    priority: OrderedFloat<f32>,
    cell: Cell,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The outcome of [`astar`]: whether `target` was reached, its cost, and the path.
#[derive(Clone, Debug)]
pub struct AstarResult {
    pub path: Option<CellPath>,
    pub cost: Option<f32>,
}

/// A* search from `source` to `target` using `heuristic` (spec §4.8); `heuristic`
/// must be admissible (never overestimate the true remaining cost) or the result
/// may not be optimal.
pub fn astar(
    grid: &Grid,
    source: Cell,
    target: Cell,
    is_accessible: &(dyn Fn(Cell) -> bool + Sync),
    step_length: &(dyn Fn(Step) -> f32 + Sync),
    heuristic: &(dyn Fn(Cell) -> f32 + Sync),
) -> SylvesResult<AstarResult> {
    let mut g_score: CellHashMap<f32> = Default::default();
    let mut came_from: CellHashMap<Step> = Default::default();
    let mut finalized: std::collections::HashSet<Cell> = Default::default();

    g_score.insert(source, 0.0);
    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { priority: OrderedFloat(heuristic(source)), cell: source });

    while let Some(HeapEntry { cell, .. }) = heap.pop() {
        if finalized.contains(&cell) {
            continue;
        }
        finalized.insert(cell);
        if cell == target {
            let cost = g_score.get(&cell).copied();
            let path = if cell == source {
                Some(CellPath::empty())
            } else {
                Some(reconstruct_path(&came_from, cell))
            };
            return Ok(AstarResult { path, cost });
        }

        let g = g_score.get(&cell).copied().unwrap_or(f32::INFINITY);

        for dir in grid.get_cell_dirs(cell)? {
            let Some((dest, inverse_dir, connection)) = grid.try_move(cell, dir)? else {
                continue;
            };
            if finalized.contains(&dest) || !is_accessible(dest) {
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
            let length = step_length(step);
            if length < 0.0 {
                continue;
            }
            let tentative_g = g + length;
            let better = g_score.get(&dest).map_or(true, |&existing| tentative_g < existing);
            if better {
                g_score.insert(dest, tentative_g);
                came_from.insert(dest, Step { length, ..step });
                let priority = tentative_g + heuristic(dest);
                heap.push(HeapEntry { priority: OrderedFloat(priority), cell: dest });
            }
        }
    }

    Ok(AstarResult { path: None, cost: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::Bound;
    use crate::grid::SquareGrid;
    use crate::pathfinding::manhattan_heuristic;

    #[test]
    fn matches_dijkstra_optimal_cost_with_admissible_heuristic() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((-10, -10), (10, 10)));
        let source = Cell::new2(0, 0);
        let target = Cell::new2(3, 4);
        let heuristic = manhattan_heuristic(&grid, target).unwrap();
        let result = astar(
            &grid,
            source,
            target,
            &super::super::always_accessible,
            &super::super::unit_step_length,
            &heuristic,
        )
        .unwrap();
        assert_eq!(result.cost, Some(7.0));
        assert_eq!(result.path.unwrap().steps.len(), 7);
    }

    #[test]
    fn unreachable_target_yields_no_path() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((0, 0), (0, 0)));
        let source = Cell::new2(0, 0);
        let target = Cell::new2(5, 5);
        let heuristic = |_c: Cell| 0.0;
        let result = astar(
            &grid,
            source,
            target,
            &super::super::always_accessible,
            &super::super::unit_step_length,
            &heuristic,
        )
        .unwrap();
        assert!(result.path.is_none());
    }
}
