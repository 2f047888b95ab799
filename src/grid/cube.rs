//! The cube grid, the only 3D concrete grid kind (spec §4.3).

use std::any::Any;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, Float, V3};

use super::{GridKind, GridTrait};

/// Direction `d`'s unit offset, matching [`crate::cell_type::cube`]'s
/// `[+X, -X, +Y, -Y, +Z, -Z]` numbering.
const OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// A regular cubic lattice.
#[derive(Clone, Debug)]
pub struct CubeGrid {
    cell_size: Float,
    bound: Option<Bound>,
}

impl CubeGrid {
    pub fn new(cell_size: Float) -> Self {
        Self { cell_size, bound: None }
    }

    pub fn with_bound(cell_size: Float, bound: Bound) -> Self {
        Self { cell_size, bound: Some(bound) }
    }

    fn in_bound(&self, cell: Cell) -> bool {
        self.bound.as_ref().map_or(true, |b| b.contains(cell))
    }
}

impl GridTrait for CubeGrid {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.in_bound(cell)
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        if !self.in_bound(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        Ok(CellType::Cube)
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        if !self.in_bound(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        let Some(&(dx, dy, dz)) = OFFSETS.get(dir as usize) else {
            return Err(SylvesError::InvalidDir);
        };
        let dest = Cell::new(cell.x + dx, cell.y + dy, cell.z + dz);
        if !self.in_bound(dest) {
            return Ok(None);
        }
        let inverse_dir = CellType::Cube.invert_dir(dir)?;
        Ok(Some((dest, inverse_dir, Connection::IDENTITY)))
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        V3::new(
            (cell.x as Float + 0.5) * self.cell_size,
            (cell.y as Float + 0.5) * self.cell_size,
            (cell.z as Float + 0.5) * self.cell_size,
        )
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        let center = self.get_cell_center(cell);
        (0..8)
            .map(|c| {
                let p = CellType::Cube.corner_position(c) * self.cell_size;
                V3::new(center.x + p.x, center.y + p.y, center.z + p.z)
            })
            .collect()
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        let cell = Cell::new(
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        );
        self.in_bound(cell).then_some(cell)
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        let min = V3::new(
            cell.x as Float * self.cell_size,
            cell.y as Float * self.cell_size,
            cell.z as Float * self.cell_size,
        );
        let max = V3::new(
            (cell.x + 1) as Float * self.cell_size,
            (cell.y + 1) as Float * self.cell_size,
            (cell.z + 1) as Float * self.cell_size,
        );
        Aabb::new(min, max)
    }

    fn is_finite(&self) -> bool {
        self.bound.is_some()
    }

    fn is_2d(&self) -> bool {
        false
    }

    fn get_cell_count(&self) -> Option<i64> {
        self.bound.as_ref().and_then(|b| b.cell_count().ok())
    }

    fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        match &self.bound {
            Some(b) => b.get_cells(),
            None => Err(SylvesError::InfiniteGrid),
        }
    }

    fn bound(&self) -> Option<&Bound> {
        self.bound.as_ref()
    }

    fn grid_kind(&self) -> GridKind {
        GridKind::Cube
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn neighbours_are_reciprocal() {
        let grid = Grid::new(CubeGrid::new(1.0));
        let a = Cell::new(0, 0, 0);
        for dir in 0..6 {
            let (b, inv, _) = grid.try_move(a, dir).unwrap().unwrap();
            let (back, inv2, _) = grid.try_move(b, inv).unwrap().unwrap();
            assert_eq!(back, a);
            assert_eq!(inv2, dir);
        }
    }

    #[test]
    fn bound_restricts_membership() {
        let grid = Grid::new(CubeGrid::new(1.0)).bound_by(Bound::cube((0, 0, 0), (1, 1, 1)));
        assert_eq!(grid.get_cell_count(), Some(8));
        assert!(!grid.is_cell_in_grid(Cell::new(2, 0, 0)));
    }
}
