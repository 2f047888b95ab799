//! Up/down-paired triangle grids (spec §4.3).

use std::any::Any;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, Float, V3};

use super::{GridKind, GridTrait};

/// Which of the two standard triangle tilings a [`TriangleGrid`] uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TriangleOrientation {
    FlatTop,
    FlatSide,
}

impl TriangleOrientation {
    fn cell_type(self) -> CellType {
        match self {
            TriangleOrientation::FlatTop => CellType::TriFT,
            TriangleOrientation::FlatSide => CellType::TriFS,
        }
    }
}

/// A triangle's orientation is implied by the parity of `x + y` (spec §4.3): even
/// sums are "up" triangles, odd sums are "down" triangles, so each unit cell of the
/// `(x, y)` lattice holds one up/down pair.
fn is_up(cell: Cell) -> bool {
    (cell.x + cell.y).rem_euclid(2) == 0
}

/// Neighbour offset and destination-direction pair for each of a triangle's 3 edges,
/// separately tabulated for up- and down-pointing triangles.
fn neighbour_offsets(up: bool) -> [(i32, i32, CellDir); 3] {
    if up {
        [(1, 0, 0), (-1, 0, 1), (0, 1, 2)]
    } else {
        [(-1, 0, 0), (1, 0, 1), (0, -1, 2)]
    }
}

/// A triangle lattice in `(x, y)` coordinates, up/down determined by parity.
#[derive(Clone, Debug)]
pub struct TriangleGrid {
    orientation: TriangleOrientation,
    cell_size: Float,
    bound: Option<Bound>,
}

impl TriangleGrid {
    pub fn new(orientation: TriangleOrientation, cell_size: Float) -> Self {
        Self { orientation, cell_size, bound: None }
    }

    pub fn with_bound(orientation: TriangleOrientation, cell_size: Float, bound: Bound) -> Self {
        Self { orientation, cell_size, bound: Some(bound) }
    }

    fn in_bound(&self, cell: Cell) -> bool {
        cell.z == 0 && self.bound.as_ref().map_or(true, |b| b.contains(cell))
    }

    fn cell_center_xy(&self, cell: Cell) -> (Float, Float) {
        let col = cell.x as Float / 2.0;
        let x = col * self.cell_size;
        let row_height = self.cell_size * f64::sqrt(3.0) / 2.0;
        let y = cell.y as Float * row_height;
        (x, y)
    }
}

impl GridTrait for TriangleGrid {
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
        let offsets = neighbour_offsets(is_up(cell));
        let Some(&(dx, dy, inverse_dir)) = offsets.get(dir as usize) else {
            return Err(SylvesError::InvalidDir);
        };
        let dest = Cell::new2(cell.x + dx, cell.y + dy);
        if !self.in_bound(dest) {
            return Ok(None);
        }
        Ok(Some((dest, inverse_dir, Connection::IDENTITY)))
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        let (x, y) = self.cell_center_xy(cell);
        V3::new(x, y, 0.0)
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        let center = self.get_cell_center(cell);
        let up = is_up(cell);
        let corner_index = |local: u32| if up { local } else { local + 3 };
        let ct = self.orientation.cell_type();
        (0..3)
            .map(|local| {
                let p = ct.corner_position(corner_index(local)) * self.cell_size;
                V3::new(center.x + p.x, center.y + p.y, 0.0)
            })
            .collect()
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        // Coarse lookup: scan the small neighbourhood of the column/row implied by
        // `position` and test each candidate's polygon via its AABB-then-winding.
        let row_height = self.cell_size * f64::sqrt(3.0) / 2.0;
        let approx_y = (position.y / row_height).round() as i32;
        let approx_x = (2.0 * position.x / self.cell_size).round() as i32;
        for dy in -2..=2 {
            for dx in -2..=2 {
                let cell = Cell::new2(approx_x + dx, approx_y + dy);
                if !self.in_bound(cell) {
                    continue;
                }
                if point_in_triangle(position, &self.get_cell_corners(cell)) {
                    return Some(cell);
                }
            }
        }
        None
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
        GridKind::Triangle
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn point_in_triangle(p: V3, corners: &[V3]) -> bool {
    let sign = |a: V3, b: V3, c: V3| (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let d1 = sign(p, corners[0], corners[1]);
    let d2 = sign(p, corners[1], corners[2]);
    let d3 = sign(p, corners[2], corners[0]);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn up_down_alternates_by_parity() {
        assert!(is_up(Cell::new2(0, 0)));
        assert!(!is_up(Cell::new2(1, 0)));
        assert!(!is_up(Cell::new2(0, 1)));
        assert!(is_up(Cell::new2(1, 1)));
    }

    #[test]
    fn neighbours_are_reciprocal() {
        let grid = Grid::new(TriangleGrid::new(TriangleOrientation::FlatTop, 1.0));
        let a = Cell::new2(0, 0);
        for dir in 0..3 {
            let (b, inv, _) = grid.try_move(a, dir).unwrap().unwrap();
            let (back, _, _) = grid.try_move(b, inv).unwrap().unwrap();
            assert_eq!(back, a, "dir {dir}");
        }
    }

    #[test]
    fn find_cell_recovers_center_neighbourhood() {
        let grid = TriangleGrid::new(TriangleOrientation::FlatTop, 1.0);
        for &cell in &[Cell::new2(0, 0), Cell::new2(1, 0), Cell::new2(-1, 2)] {
            let center = grid.get_cell_center(cell);
            assert_eq!(grid.find_cell(center), Some(cell));
        }
    }
}
