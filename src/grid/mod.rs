//! The uniform interface over concrete grids, mesh grids, and modifiers (spec §4.3).
//!
//! Unlike [`crate::cell_type::CellType`] and [`crate::bound::Bound`], the set of
//! `Grid` implementations is open — modifiers wrap arbitrary grids to arbitrary
//! depth, and spec §9's Design Notes explicitly keep dynamic dispatch available for
//! "user-provided Grid implementations if that extension point is preserved". So
//! `Grid` is a thin value wrapper around `Arc<dyn GridTrait>`: concrete grid kinds
//! and modifiers alike implement [`GridTrait`] and are boxed uniformly, which also
//! lets a modifier wrap *any* grid (including another modifier) without a closed
//! enum needing a case for every nesting.

mod cube;
mod hex;
mod mesh_grid;
pub mod modifiers;
mod square;
mod triangle;
mod voronoi;

pub use cube::CubeGrid;
pub use hex::{HexGrid, HexOrientation};
pub use mesh_grid::MeshGrid;
pub use square::SquareGrid;
pub use triangle::{TriangleGrid, TriangleOrientation};
pub use voronoi::VoronoiGrid;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, CellRotation, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, V3};

/// The handful of concrete lattice shapes pathfinding heuristics and similar
/// geometry-aware callers need to recognise (spec §4.8's `manhattan_heuristic`).
/// Unlike [`GridTrait::as_any`] (an escape hatch for recognising one *specific*
/// modifier), this is forwarded through every geometry-preserving modifier so the
/// underlying concrete shape stays visible no matter how many layers wrap it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum GridKind {
    Square,
    Hex,
    Triangle,
    Cube,
    /// Mesh/Voronoi grids, and anything else with no fixed cell shape.
    Other,
}

/// Operations every grid kind (concrete or modifier) must implement (spec §4.3).
pub trait GridTrait: fmt::Debug + Send + Sync {
    fn is_cell_in_grid(&self, cell: Cell) -> bool;

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType>;

    /// The single most important operation: attempts to step from `cell` in
    /// direction `dir`. Returns `Ok(None)` if there is no neighbour there (off the
    /// edge of a bounded/finite grid, masked out, etc) — that is not an error.
    /// Returns `Err` only when `cell` itself is not in the grid.
    fn try_move(
        &self,
        cell: Cell,
        dir: CellDir,
    ) -> SylvesResult<Option<(Cell, CellDir, Connection)>>;

    fn get_cell_dirs(&self, cell: Cell) -> SylvesResult<Vec<CellDir>> {
        let ct = self.get_cell_type(cell)?;
        Ok(ct.enumerate_dirs().collect())
    }

    fn get_cell_center(&self, cell: Cell) -> V3;

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3>;

    /// The cell's polygon, vertex count = `.len()`. Defaults to the corners in
    /// order, which is correct for every grid kind in this crate.
    fn get_polygon(&self, cell: Cell) -> Vec<V3> {
        self.get_cell_corners(cell)
    }

    fn find_cell(&self, position: V3) -> Option<Cell>;

    fn get_cell_aabb(&self, cell: Cell) -> Aabb;

    fn is_finite(&self) -> bool;

    fn is_2d(&self) -> bool;

    fn is_3d(&self) -> bool {
        !self.is_2d()
    }

    /// `None` means infinite (spec §4.3: "negative if infinite"; represented here
    /// as `Option` rather than a sentinel, see `DESIGN.md`).
    fn get_cell_count(&self) -> Option<i64>;

    /// Enumerates every cell, only valid when [`GridTrait::is_finite`].
    fn get_cells(&self) -> SylvesResult<Vec<Cell>>;

    fn bound(&self) -> Option<&Bound> {
        None
    }

    /// The underlying concrete lattice shape, defaulting to [`GridKind::Other`].
    /// Geometry-preserving modifiers (bound-by, mask, bijection, nested) override
    /// this to forward to the grid they wrap, so it stays meaningful no matter how
    /// many layers of modifier surround the concrete grid.
    fn grid_kind(&self) -> GridKind {
        GridKind::Other
    }

    /// Escape hatch used by [`Grid::unbounded`] to recognise a `BoundByModifier`
    /// without a dedicated enum case for it.
    fn as_any(&self) -> &dyn Any;
}

/// A uniform handle to any grid: concrete (square/hex/triangle/cube/mesh/Voronoi)
/// or a modifier wrapping another `Grid` (spec §4.3).
#[derive(Clone)]
pub struct Grid(Arc<dyn GridTrait>);

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Grid {
    pub fn new(inner: impl GridTrait + 'static) -> Self {
        Grid(Arc::new(inner))
    }

    pub fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.0.is_cell_in_grid(cell)
    }

    pub fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        self.0.get_cell_type(cell)
    }

    pub fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        self.0.try_move(cell, dir)
    }

    pub fn get_cell_dirs(&self, cell: Cell) -> SylvesResult<Vec<CellDir>> {
        self.0.get_cell_dirs(cell)
    }

    pub fn get_cell_center(&self, cell: Cell) -> V3 {
        self.0.get_cell_center(cell)
    }

    pub fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        self.0.get_cell_corners(cell)
    }

    pub fn get_polygon(&self, cell: Cell) -> Vec<V3> {
        self.0.get_polygon(cell)
    }

    pub fn find_cell(&self, position: V3) -> Option<Cell> {
        self.0.find_cell(position)
    }

    pub fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        self.0.get_cell_aabb(cell)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    pub fn is_2d(&self) -> bool {
        self.0.is_2d()
    }

    pub fn is_3d(&self) -> bool {
        self.0.is_3d()
    }

    pub fn get_cell_count(&self) -> Option<i64> {
        self.0.get_cell_count()
    }

    pub fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        self.0.get_cells()
    }

    /// Computes [`Grid::get_cell_center`] for every cell of this grid's [`Bound`] in
    /// parallel (spec **[ADDED]** Configuration: bulk geometry queries over
    /// independent cells benefit from data parallelism, gated behind the `rayon`
    /// feature).
    #[cfg(feature = "rayon")]
    pub fn par_cell_centers(&self) -> SylvesResult<Vec<V3>> {
        use rayon::prelude::*;
        let cells = self.get_cells()?;
        Ok(cells.par_iter().map(|&cell| self.get_cell_center(cell)).collect())
    }

    pub fn bound(&self) -> Option<&Bound> {
        self.0.bound()
    }

    pub fn grid_kind(&self) -> GridKind {
        self.0.grid_kind()
    }

    /// Escape hatch for callers that need to recognise a specific concrete grid or
    /// modifier kind (e.g. [`crate::pathfinding::manhattan_heuristic`]'s grid-kind
    /// dispatch, spec §4.8).
    pub fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }

    /// Wraps this grid with a [`modifiers::BoundByModifier`] (spec §4.3).
    pub fn bound_by(&self, bound: Bound) -> Grid {
        Grid::new(modifiers::BoundByModifier::new(self.clone(), bound))
    }

    /// Returns an equivalent grid with no bound (spec §4.3). If this grid is a
    /// [`modifiers::BoundByModifier`], returns the grid it wraps; otherwise returns
    /// a clone of `self` (a grid with `bound() == None` is already unbounded).
    pub fn unbounded(&self) -> Grid {
        match self.0.as_any().downcast_ref::<modifiers::BoundByModifier>() {
            Some(bound_by) => bound_by.inner().clone(),
            None => self.clone(),
        }
    }
}

#[cfg(all(test, feature = "rayon"))]
mod rayon_tests {
    use super::*;
    use crate::bound::Bound;
    use square::SquareGrid;

    #[test]
    fn par_cell_centers_matches_sequential() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((0, 0), (2, 2)));
        let sequential: Vec<V3> = grid.get_cells().unwrap().iter().map(|&c| grid.get_cell_center(c)).collect();
        assert_eq!(grid.par_cell_centers().unwrap(), sequential);
    }
}
