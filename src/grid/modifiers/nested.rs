//! Packs an outer cell and a bounded inner ("child") cell into one [`Cell`] via
//! 16-bit bit-slicing per axis (spec §4.3: "Nested modifier").

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, V3};

use crate::grid::{Grid, GridKind, GridTrait};

fn pack_axis(outer: i32, inner: i32) -> i32 {
    (outer << 16) | ((inner as i16) as i32 & 0xFFFF)
}

fn unpack_axis(packed: i32) -> (i32, i32) {
    (packed >> 16, (packed as i16) as i32)
}

/// Packs an outer-grid cell and a child-grid cell into one combined [`Cell`],
/// axis by axis (spec §4.3).
pub fn pack(outer: Cell, inner: Cell) -> Cell {
    Cell::new(
        pack_axis(outer.x, inner.x),
        pack_axis(outer.y, inner.y),
        pack_axis(outer.z, inner.z),
    )
}

/// The outer-grid half of a combined cell.
pub fn get_base(combined: Cell) -> Cell {
    Cell::new(
        unpack_axis(combined.x).0,
        unpack_axis(combined.y).0,
        unpack_axis(combined.z).0,
    )
}

/// The child-grid half of a combined cell.
pub fn get_child(combined: Cell) -> Cell {
    Cell::new(
        unpack_axis(combined.x).1,
        unpack_axis(combined.y).1,
        unpack_axis(combined.z).1,
    )
}

type ReentryFn = Arc<dyn Fn(CellDir, Cell) -> Cell + Send + Sync>;

/// Default boundary-stitching rule (spec §4.3: "the spec pins it to a face-centric
/// rule" as one of the two allowed collaborator contracts): re-enter the child grid
/// by wrapping the exiting cell's coordinates modulo the child's rectangular or
/// cuboid bound, so leaving one face re-enters through the opposite face.
fn wrapping_reentry(child_bound: Bound) -> ReentryFn {
    Arc::new(move |_dir, exiting: Cell| match &child_bound {
        Bound::Rect(r) => {
            let wrap = |v: i32, lo: i32, hi: i32| {
                let span = hi - lo + 1;
                lo + (v - lo).rem_euclid(span)
            };
            Cell::new2(wrap(exiting.x, r.min.0, r.max.0), wrap(exiting.y, r.min.1, r.max.1))
        }
        Bound::Cube(c) => {
            let wrap = |v: i32, lo: i32, hi: i32| {
                let span = hi - lo + 1;
                lo + (v - lo).rem_euclid(span)
            };
            Cell::new(
                wrap(exiting.x, c.min.0, c.max.0),
                wrap(exiting.y, c.min.1, c.max.1),
                wrap(exiting.z, c.min.2, c.max.2),
            )
        }
        _ => exiting,
    })
}

/// A grid formed by tiling `outer` with copies of a bounded `child` grid, the pair
/// addressed by a single packed [`Cell`] (spec §4.3).
#[derive(Clone)]
pub struct NestedModifier {
    outer: Grid,
    child: Grid,
    reentry: ReentryFn,
}

impl fmt::Debug for NestedModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedModifier")
            .field("outer", &self.outer)
            .field("child", &self.child)
            .finish()
    }
}

impl NestedModifier {
    /// Uses a custom re-entry callback mapping `(exit_dir, child_cell_that_exited)`
    /// to the child cell to re-enter at in the newly-stepped-to outer cell.
    pub fn with_reentry(
        outer: Grid,
        child: Grid,
        reentry: impl Fn(CellDir, Cell) -> Cell + Send + Sync + 'static,
    ) -> Self {
        Self { outer, child, reentry: Arc::new(reentry) }
    }

    /// Uses the default wrap-around re-entry rule, requiring `child` to carry a
    /// `Rect` or `Cube` [`Bound`] (spec §4.3's face-centric default).
    pub fn wrapping(outer: Grid, child: Grid) -> SylvesResult<Self> {
        let bound = child.bound().cloned().ok_or(SylvesError::NotSupported)?;
        let reentry = wrapping_reentry(bound);
        Ok(Self { outer, child, reentry })
    }
}

impl GridTrait for NestedModifier {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.outer.is_cell_in_grid(get_base(cell)) && self.child.is_cell_in_grid(get_child(cell))
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        self.child.get_cell_type(get_child(cell))
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        if !self.is_cell_in_grid(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        let base = get_base(cell);
        let child_cell = get_child(cell);

        match self.child.try_move(child_cell, dir)? {
            Some((dest, inv, conn)) => Ok(Some((pack(base, dest), inv, conn))),
            None => match self.outer.try_move(base, dir)? {
                Some((new_base, inv, conn)) => {
                    let reentered = (self.reentry)(dir, child_cell);
                    Ok(Some((pack(new_base, reentered), inv, conn)))
                }
                None => Ok(None),
            },
        }
    }

    fn get_cell_dirs(&self, cell: Cell) -> SylvesResult<Vec<CellDir>> {
        self.child.get_cell_dirs(get_child(cell))
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        let outer_center = self.outer.get_cell_center(get_base(cell));
        let child_center = self.child.get_cell_center(get_child(cell));
        V3::new(
            outer_center.x + child_center.x,
            outer_center.y + child_center.y,
            outer_center.z + child_center.z,
        )
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        let outer_center = self.outer.get_cell_center(get_base(cell));
        self.child
            .get_cell_corners(get_child(cell))
            .into_iter()
            .map(|p| V3::new(p.x + outer_center.x, p.y + outer_center.y, p.z + outer_center.z))
            .collect()
    }

    fn find_cell(&self, _position: V3) -> Option<Cell> {
        None
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        self.child.get_cell_aabb(get_child(cell))
    }

    fn is_finite(&self) -> bool {
        self.outer.is_finite() && self.child.is_finite()
    }

    fn is_2d(&self) -> bool {
        self.child.is_2d()
    }

    fn get_cell_count(&self) -> Option<i64> {
        match (self.outer.get_cell_count(), self.child.get_cell_count()) {
            (Some(a), Some(b)) => a.checked_mul(b),
            _ => None,
        }
    }

    fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        let outer_cells = self.outer.get_cells()?;
        let child_cells = self.child.get_cells()?;
        Ok(outer_cells
            .into_iter()
            .flat_map(|o| child_cells.iter().map(move |&c| pack(o, c)))
            .collect())
    }

    fn bound(&self) -> Option<&Bound> {
        None
    }

    fn grid_kind(&self) -> GridKind {
        self.child.grid_kind()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip_within_16_bits() {
        for &(x, y, z) in &[(0, 0, 0), (32767, -32768, 100), (-1, -1, -1), (12345, -6789, 32767)] {
            let outer = Cell::new(x, y, z);
            let inner = Cell::new(z, x, y);
            let combined = pack(outer, inner);
            assert_eq!(get_base(combined), outer);
            assert_eq!(get_child(combined), inner);
        }
    }
}
