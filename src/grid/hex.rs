//! Flat-topped and pointy-topped hex grids (spec §4.3).

use std::any::Any;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, Float, V3};

use super::{GridKind, GridTrait};

/// Which of the two standard hex tilings a [`HexGrid`] uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HexOrientation {
    FlatTop,
    PointyTop,
}

impl HexOrientation {
    fn cell_type(self) -> CellType {
        match self {
            HexOrientation::FlatTop => CellType::HexFT,
            HexOrientation::PointyTop => CellType::HexPT,
        }
    }

    /// Axial-direction offsets, indexed to line up with [`CellType::corner_position`]'s
    /// numbering (direction `d` points between corners `d` and `d+1`).
    fn offsets(self) -> [(i32, i32); 6] {
        match self {
            HexOrientation::FlatTop => [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)],
            HexOrientation::PointyTop => [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)],
        }
    }
}

/// A hex lattice in axial coordinates (`Cell.x`/`Cell.y`, `z` left at zero).
#[derive(Clone, Debug)]
pub struct HexGrid {
    orientation: HexOrientation,
    cell_size: Float,
    bound: Option<Bound>,
}

impl HexGrid {
    pub fn new(orientation: HexOrientation, cell_size: Float) -> Self {
        Self { orientation, cell_size, bound: None }
    }

    pub fn with_bound(orientation: HexOrientation, cell_size: Float, bound: Bound) -> Self {
        Self { orientation, cell_size, bound: Some(bound) }
    }

    fn in_bound(&self, cell: Cell) -> bool {
        cell.z == 0 && self.bound.as_ref().map_or(true, |b| b.contains(cell))
    }

    /// Axial -> world-space centre, using the standard hex-to-cartesian basis for
    /// this orientation.
    fn axial_to_world(&self, cell: Cell) -> (Float, Float) {
        let (q, r) = (cell.x as Float, cell.y as Float);
        match self.orientation {
            HexOrientation::FlatTop => {
                let x = 1.5 * q * self.cell_size;
                let y = (f64::sqrt(3.0) / 2.0 * q + f64::sqrt(3.0) * r) * self.cell_size;
                (x, y)
            }
            HexOrientation::PointyTop => {
                let x = (f64::sqrt(3.0) * q + f64::sqrt(3.0) / 2.0 * r) * self.cell_size;
                let y = 1.5 * r * self.cell_size;
                (x, y)
            }
        }
    }
}

impl GridTrait for HexGrid {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.in_bound(cell)
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        if !self.in_bound(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        Ok(self.orientation.cell_type())
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        if !self.in_bound(cell) {
            return Err(SylvesError::CellNotInGrid);
        }
        let ct = self.orientation.cell_type();
        let Some(&(dx, dy)) = self.orientation.offsets().get(dir as usize) else {
            return Err(SylvesError::InvalidDir);
        };
        let dest = Cell::new2(cell.x + dx, cell.y + dy);
        if !self.in_bound(dest) {
            return Ok(None);
        }
        let inverse_dir = ct.invert_dir(dir)?;
        Ok(Some((dest, inverse_dir, Connection::IDENTITY)))
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        let (x, y) = self.axial_to_world(cell);
        V3::new(x, y, 0.0)
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        let center = self.get_cell_center(cell);
        let ct = self.orientation.cell_type();
        (0..6)
            .map(|c| {
                let p = ct.corner_position(c) * self.cell_size;
                V3::new(center.x + p.x, center.y + p.y, 0.0)
            })
            .collect()
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        // Axial round-trip: invert `axial_to_world` then round to nearest hex via
        // cube-coordinate rounding.
        let (fq, fr) = match self.orientation {
            HexOrientation::FlatTop => {
                let q = (2.0 / 3.0 * position.x) / self.cell_size;
                let r = (-1.0 / 3.0 * position.x + f64::sqrt(3.0) / 3.0 * position.y) / self.cell_size;
                (q, r)
            }
            HexOrientation::PointyTop => {
                let q = (f64::sqrt(3.0) / 3.0 * position.x - 1.0 / 3.0 * position.y) / self.cell_size;
                let r = (2.0 / 3.0 * position.y) / self.cell_size;
                (q, r)
            }
        };
        let cell = cube_round(fq, fr);
        self.in_bound(cell).then_some(cell)
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        let corners = self.get_cell_corners(cell);
        let mut aabb = Aabb::new(corners[0], corners[0]);
        for &c in &corners[1..] {
            aabb = aabb.union(&Aabb::new(c, c));
        }
        aabb
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
        GridKind::Hex
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Rounds fractional axial coordinates to the nearest hex, via the standard
/// cube-coordinate rounding trick (`x + y + z == 0`).
fn cube_round(q: Float, r: Float) -> Cell {
    let x = q;
    let z = r;
    let y = -x - z;
    let (mut rx, mut ry, mut rz) = (x.round(), y.round(), z.round());
    let (dx, dy, dz) = ((rx - x).abs(), (ry - y).abs(), (rz - z).abs());
    if dx > dy && dx > dz {
        rx = -ry - rz;
    } else if dy > dz {
        ry = -rx - rz;
    } else {
        rz = -rx - ry;
    }
    Cell::new2(rx as i32, rz as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn neighbours_are_reciprocal() {
        for orientation in [HexOrientation::FlatTop, HexOrientation::PointyTop] {
            let grid = Grid::new(HexGrid::new(orientation, 1.0));
            let a = Cell::new2(0, 0);
            for dir in 0..6 {
                let (b, inv, _) = grid.try_move(a, dir).unwrap().unwrap();
                let (back, _, _) = grid.try_move(b, inv).unwrap().unwrap();
                assert_eq!(back, a, "{orientation:?} dir {dir}");
            }
        }
    }

    #[test]
    fn find_cell_recovers_center() {
        let grid = HexGrid::new(HexOrientation::FlatTop, 1.0);
        for q in -3..=3 {
            for r in -3..=3 {
                let cell = Cell::new2(q, r);
                let center = grid.get_cell_center(cell);
                assert_eq!(grid.find_cell(center), Some(cell));
            }
        }
    }
}
