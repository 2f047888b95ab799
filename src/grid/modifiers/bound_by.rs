//! Wraps a grid, refusing membership outside an additional [`Bound`] (spec §4.3).

use std::any::Any;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, V3};

use crate::grid::{Grid, GridKind, GridTrait};

/// Returned by [`Grid::bound_by`]; [`Grid::unbounded`] recognises and unwraps it.
#[derive(Clone, Debug)]
pub struct BoundByModifier {
    inner: Grid,
    bound: Bound,
}

impl BoundByModifier {
    pub fn new(inner: Grid, bound: Bound) -> Self {
        Self { inner, bound }
    }

    pub fn inner(&self) -> &Grid {
        &self.inner
    }
}

impl GridTrait for BoundByModifier {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.bound.contains(cell) && self.inner.is_cell_in_grid(cell)
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        if !self.is_cell_in_grid(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        self.inner.get_cell_type(cell)
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        if !self.is_cell_in_grid(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        match self.inner.try_move(cell, dir)? {
            Some((dest, inv, conn)) if self.bound.contains(dest) => Ok(Some((dest, inv, conn))),
            _ => Ok(None),
        }
    }

    fn get_cell_dirs(&self, cell: Cell) -> SylvesResult<Vec<CellDir>> {
        if !self.is_cell_in_grid(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        self.inner.get_cell_dirs(cell)
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        self.inner.get_cell_center(cell)
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        self.inner.get_cell_corners(cell)
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        self.inner.find_cell(position).filter(|&c| self.bound.contains(c))
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        self.inner.get_cell_aabb(cell)
    }

    fn is_finite(&self) -> bool {
        true
    }

    fn is_2d(&self) -> bool {
        self.inner.is_2d()
    }

    fn get_cell_count(&self) -> Option<i64> {
        self.bound.cell_count().ok()
    }

    fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        Ok(self
            .bound
            .get_cells()?
            .into_iter()
            .filter(|&c| self.inner.is_cell_in_grid(c))
            .collect())
    }

    fn bound(&self) -> Option<&Bound> {
        Some(&self.bound)
    }

    fn grid_kind(&self) -> GridKind {
        self.inner.grid_kind()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SquareGrid;

    #[test]
    fn refuses_cells_outside_bound() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((0, 0), (1, 1)));
        assert!(grid.is_cell_in_grid(Cell::new2(0, 0)));
        assert!(!grid.is_cell_in_grid(Cell::new2(5, 5)));
        assert!(grid.try_move(Cell::new2(1, 1), 0).unwrap().is_none());
    }

    #[test]
    fn unbounded_recovers_inner_grid() {
        let base = Grid::new(SquareGrid::new(1.0));
        let bounded = base.bound_by(Bound::rect((0, 0), (1, 1)));
        assert_eq!(bounded.unbounded().get_cell_count(), None);
    }
}
