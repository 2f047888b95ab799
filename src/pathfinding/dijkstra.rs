//! Dijkstra's algorithm: min-heap keyed by accumulated length, relaxed via
//! `step_length` (spec §4.8).

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
    cost: OrderedFloat<f32>,
    cell: Cell,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest cost first.
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The outcome of [`dijkstra`]: per-cell shortest accumulated length and the step
/// that achieved it.
#[derive(Clone, Debug, Default)]
pub struct DijkstraResult {
    source: Cell,
    cost: CellHashMap<f32>,
    came_from: CellHashMap<Step>,
}

impl DijkstraResult {
    pub fn cost(&self, cell: Cell) -> Option<f32> {
        if cell == self.source {
            Some(0.0)
        } else {
            self.cost.get(&cell).copied()
        }
    }

    pub fn path_to(&self, cell: Cell) -> Option<CellPath> {
        if cell == self.source {
            return Some(CellPath::empty());
        }
        self.cost.get(&cell)?;
        Some(reconstruct_path(&self.came_from, cell))
    }
}

/// Dijkstra's algorithm from `source` (spec §4.8): "min-heap keyed by accumulated
/// length; each pop finalises; relaxation uses `step_length`".
pub fn dijkstra(
    grid: &Grid,
    source: Cell,
    target: Option<Cell>,
    is_accessible: &(dyn Fn(Cell) -> bool + Sync),
    step_length: &(dyn Fn(Step) -> f32 + Sync),
) -> SylvesResult<DijkstraResult> {
    let mut cost: CellHashMap<f32> = Default::default();
    let mut came_from: CellHashMap<Step> = Default::default();
    let mut finalized: std::collections::HashSet<Cell> = Default::default();

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: OrderedFloat(0.0), cell: source });

    while let Some(HeapEntry { cost: current_cost, cell }) = heap.pop() {
        if finalized.contains(&cell) {
            continue;
        }
        finalized.insert(cell);
        if Some(cell) == target {
            break;
        }

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
            let tentative = current_cost.0 + length;
            let better = cost.get(&dest).map_or(true, |&existing| tentative < existing);
            if better {
                cost.insert(dest, tentative);
                came_from.insert(dest, Step { length, ..step });
                heap.push(HeapEntry { cost: OrderedFloat(tentative), cell: dest });
            }
        }
    }

    Ok(DijkstraResult { source, cost, came_from })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::Bound;
    use crate::grid::SquareGrid;

    #[test]
    fn uniform_cost_matches_bfs_distance() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((-10, -10), (10, 10)));
        let source = Cell::new2(0, 0);
        let target = Cell::new2(3, 4);
        let result = dijkstra(&grid, source, Some(target), &super::super::always_accessible, &super::super::unit_step_length).unwrap();
        assert_eq!(result.cost(target), Some(7.0));
    }

    #[test]
    fn weighted_step_prefers_cheaper_detour() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((-5, -5), (5, 5)));
        let source = Cell::new2(0, 0);
        let target = Cell::new2(1, 0);
        // Direct step along +X costs 10; any 2-step detour via y costs 1+1 = 2.
        let step_length = |step: Step| if step.src == source && step.dir == 0 { 10.0 } else { 1.0 };
        let result = dijkstra(&grid, source, Some(target), &super::super::always_accessible, &step_length).unwrap();
        assert_eq!(result.cost(target), Some(2.0));
    }
}
