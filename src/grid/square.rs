//! The square grid (spec §4.3, §8 scenario 1/2).

use std::any::Any;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, Float, V3};

use super::{GridKind, GridTrait};

/// Direction `d`'s unit offset, indices matching [`CellType::Square`]'s `NGon(4)`
/// numbering (`rotate_dir(0, 1) == 1`, spec §8 scenario 2).
const OFFSETS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// An infinite (unless [`Grid::bound_by`](super::Grid::bound_by) wraps it) regular
/// square lattice.
#[derive(Clone, Debug)]
pub struct SquareGrid {
    cell_size: Float,
    bound: Option<Bound>,
}

impl SquareGrid {
    pub fn new(cell_size: Float) -> Self {
        Self { cell_size, bound: None }
    }

    pub fn with_bound(cell_size: Float, bound: Bound) -> Self {
        Self { cell_size, bound: Some(bound) }
    }

    fn in_bound(&self, cell: Cell) -> bool {
        cell.z == 0 && self.bound.as_ref().map_or(true, |b| b.contains(cell))
    }
}

impl GridTrait for SquareGrid {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.in_bound(cell)
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        if !self.in_bound(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        Ok(CellType::Square)
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        if !self.in_bound(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        let Some(&(dx, dy)) = OFFSETS.get(dir as usize) else {
            return Err(SylvesError::InvalidDir);
        };
        let dest = Cell::new2(cell.x + dx, cell.y + dy);
        if !self.in_bound(dest) {
            return Ok(None);
        }
        let inverse_dir = CellType::Square.invert_dir(dir)?;
        Ok(Some((dest, inverse_dir, Connection::IDENTITY)))
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        V3::new(
            (cell.x as Float + 0.5) * self.cell_size,
            (cell.y as Float + 0.5) * self.cell_size,
            0.0,
        )
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        let center = self.get_cell_center(cell);
        (0..4)
            .map(|c| {
                let p = CellType::Square.corner_position(c) * self.cell_size;
                V3::new(center.x + p.x, center.y + p.y, 0.0)
            })
            .collect()
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        let cell = Cell::new2(
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        );
        self.in_bound(cell).then_some(cell)
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        let min = V3::new(cell.x as Float * self.cell_size, cell.y as Float * self.cell_size, 0.0);
        let max = V3::new(
            (cell.x + 1) as Float * self.cell_size,
            (cell.y + 1) as Float * self.cell_size,
            0.0,
        );
        Aabb::new(min, max)
    }

    fn is_finite(&self) -> bool {
        self.bound.is_some()
    }

    fn is_2d(&self) -> bool {
        true
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
        GridKind::Square
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellRotation;
    use crate::grid::Grid;

    #[test]
    fn scenario_1_rect_bound() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((0, 0), (2, 1)));
        assert_eq!(grid.get_cell_count(), Some(6));
        assert!(grid.is_cell_in_grid(Cell::new2(0, 0)));
        assert!(!grid.is_cell_in_grid(Cell::new2(3, 0)));
        assert!(grid.unbounded().get_cell_count().is_none());
    }

    #[test]
    fn scenario_2_cell_type() {
        let ct = CellType::Square;
        assert_eq!(ct.dir_count(), 4);
        assert_eq!(ct.corner_count(), 4);
        assert_eq!(ct.dimension(), 2);
        assert_eq!(ct.rotate_dir(0, CellRotation::rotation(1)).unwrap(), 1);
        assert_eq!(ct.invert_dir(0).unwrap(), 2);
    }

    #[test]
    fn reciprocity() {
        let grid = Grid::new(SquareGrid::new(1.0));
        let a = Cell::new2(0, 0);
        for dir in 0..4 {
            let (b, inv, _) = grid.try_move(a, dir).unwrap().unwrap();
            let (back, inv2, _) = grid.try_move(b, inv).unwrap().unwrap();
            assert_eq!(back, a);
            assert_eq!(inv2, dir);
        }
    }
}
