//! A grid modifier that relabels cells through a pair of pure functions (spec §4.3:
//! "Bijection modifier").

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, V3};

use crate::grid::{Grid, GridKind, GridTrait};

type CellFn = Arc<dyn Fn(Cell) -> Cell + Send + Sync>;

/// Wraps `inner`, presenting its cells renamed by `forward`/`backward` (which must
/// be mutual inverses over the cells `inner` considers in-grid). Per spec §4.3,
/// `try_move(src, dir) = forward(base.try_move(backward(src), dir))`, and the
/// modifier refuses (`NotSupported`) if either function is absent — this type
/// requires both at construction, so that failure mode cannot arise here.
#[derive(Clone)]
pub struct BijectionModifier {
    inner: Grid,
    forward: CellFn,
    backward: CellFn,
}

impl fmt::Debug for BijectionModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BijectionModifier").field("inner", &self.inner).finish()
    }
}

impl BijectionModifier {
    pub fn new(
        inner: Grid,
        forward: impl Fn(Cell) -> Cell + Send + Sync + 'static,
        backward: impl Fn(Cell) -> Cell + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            forward: Arc::new(forward),
            backward: Arc::new(backward),
        }
    }
}

impl GridTrait for BijectionModifier {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.inner.is_cell_in_grid((self.backward)(cell))
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        self.inner.get_cell_type((self.backward)(cell))
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        match self.inner.try_move((self.backward)(cell), dir)? {
            Some((dest, inv, conn)) => Ok(Some(((self.forward)(dest), inv, conn))),
            None => Ok(None),
        }
    }

    fn get_cell_dirs(&self, cell: Cell) -> SylvesResult<Vec<CellDir>> {
        self.inner.get_cell_dirs((self.backward)(cell))
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        self.inner.get_cell_center((self.backward)(cell))
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        self.inner.get_cell_corners((self.backward)(cell))
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        self.inner.find_cell(position).map(|c| (self.forward)(c))
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        self.inner.get_cell_aabb((self.backward)(cell))
    }

    fn is_finite(&self) -> bool {
        self.inner.is_finite()
    }

    fn is_2d(&self) -> bool {
        self.inner.is_2d()
    }

    fn get_cell_count(&self) -> Option<i64> {
        self.inner.get_cell_count()
    }

    fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        Ok(self.inner.get_cells()?.into_iter().map(|c| (self.forward)(c)).collect())
    }

    fn bound(&self) -> Option<&Bound> {
        None
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
    fn relabels_cells_through_the_bijection() {
        let base = Grid::new(SquareGrid::new(1.0));
        let shifted = Grid::new(BijectionModifier::new(
            base,
            |c| Cell::new2(c.x + 10, c.y),
            |c| Cell::new2(c.x - 10, c.y),
        ));
        assert!(shifted.is_cell_in_grid(Cell::new2(10, 0)));
        let (dest, _, _) = shifted.try_move(Cell::new2(10, 0), 0).unwrap().unwrap();
        assert_eq!(dest, Cell::new2(11, 0));
    }
}
