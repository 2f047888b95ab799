//! A single generic pathfinding engine parameterised over the [`crate::grid::Grid`]
//! protocol (spec §4.8).

mod astar;
mod bfs;
mod dijkstra;
mod kruskal;

pub use astar::{astar, AstarResult};
pub use bfs::{bfs, BfsResult};
pub use dijkstra::{dijkstra, DijkstraResult};
pub use kruskal::{kruskal_mst, MstEdge};

use crate::cell::{Cell, CellPath, Step};
use crate::grid::Grid;

/// Whether a cell may be entered at all (spec §4.8); defaults to "all accessible".
pub trait IsAccessible: Fn(Cell) -> bool + Send + Sync {}
impl<T: Fn(Cell) -> bool + Send + Sync> IsAccessible for T {}

/// The traversal cost of a step; a negative return marks the step inaccessible
/// (spec §4.8). Defaults to a uniform cost of 1.
pub trait StepLength: Fn(Step) -> f32 + Send + Sync {}
impl<T: Fn(Step) -> f32 + Send + Sync> StepLength for T {}

/// An admissible lower-bound estimate to the goal, required by [`astar`].
pub trait Heuristic: Fn(Cell) -> f32 + Send + Sync {}
impl<T: Fn(Cell) -> f32 + Send + Sync> Heuristic for T {}

/// The default uniform step length (spec §4.8: "default 1").
pub fn unit_step_length(_step: Step) -> f32 {
    1.0
}

/// The default "every cell is accessible" predicate.
pub fn always_accessible(_cell: Cell) -> bool {
    true
}

/// Walks parent-step back-pointers from `goal` to `source`, reversing into a
/// forward-ordered [`CellPath`] (used by BFS/Dijkstra/A*, spec §4.8).
pub(crate) fn reconstruct_path(
    came_from: &crate::bound::CellHashMap<Step>,
    goal: Cell,
) -> CellPath {
    let mut steps = Vec::new();
    let mut current = goal;
    while let Some(&step) = came_from.get(&current) {
        current = step.src;
        steps.push(step);
    }
    steps.reverse();
    CellPath { steps }
}

/// Built-in admissible heuristic: scaled Manhattan distance in cell-space, valid
/// for `{Square, Cube, Triangle, Hex}` grid kinds and `None` otherwise (spec §4.8).
pub fn manhattan_heuristic(grid: &Grid, goal: Cell) -> Option<impl Fn(Cell) -> f32 + '_> {
    use crate::grid::GridKind;

    let scale = match grid.grid_kind() {
        GridKind::Square | GridKind::Cube => 1.0,
        GridKind::Hex | GridKind::Triangle => 0.5,
        GridKind::Other => return None,
    };
    Some(move |cell: Cell| {
        let dx = (cell.x - goal.x).unsigned_abs() as f32;
        let dy = (cell.y - goal.y).unsigned_abs() as f32;
        let dz = (cell.z - goal.z).unsigned_abs() as f32;
        scale * (dx + dy + dz)
    })
}
