//! A grid modifier that restricts membership by an arbitrary predicate (spec §4.3:
//! "Mask modifier").

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, V3};

use crate::grid::{Grid, GridKind, GridTrait};

type Predicate = Arc<dyn Fn(Cell) -> bool + Send + Sync>;

/// Wraps `inner`, hiding cells that fail `predicate`. `try_move` returns `None` for
/// destinations the predicate rejects; enumeration filters by it too (spec §4.3).
#[derive(Clone)]
pub struct MaskModifier {
    inner: Grid,
    predicate: Predicate,
}

impl fmt::Debug for MaskModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskModifier").field("inner", &self.inner).finish()
    }
}

impl MaskModifier {
    pub fn new(inner: Grid, predicate: impl Fn(Cell) -> bool + Send + Sync + 'static) -> Self {
        Self { inner, predicate: Arc::new(predicate) }
    }
}

impl GridTrait for MaskModifier {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        (self.predicate)(cell) && self.inner.is_cell_in_grid(cell)
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
            Some((dest, inv, conn)) if (self.predicate)(dest) => Ok(Some((dest, inv, conn))),
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
        self.inner.find_cell(position).filter(|&c| (self.predicate)(c))
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
        self.get_cells().ok().map(|c| c.len() as i64)
    }

    fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        let base = self.inner.get_cells()?;
        Ok(base.into_iter().filter(|&c| (self.predicate)(c)).collect())
    }

    fn bound(&self) -> Option<&Bound> {
        self.inner.bound()
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
    use crate::bound::Bound;
    use crate::grid::SquareGrid;

    #[test]
    fn predicate_hides_odd_cells() {
        let base = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((0, 0), (3, 0)));
        let masked = Grid::new(MaskModifier::new(base, |c| c.x % 2 == 0));
        let cells = masked.get_cells().unwrap();
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.x % 2 == 0));
        assert!(masked.try_move(Cell::new2(0, 0), 0).unwrap().is_none());
    }
}
