//! A predicate-plus-enumerator over a subset of cells (spec §4.2).
//!
//! Like [`crate::cell_type::CellType`], the variant set is closed, so `Bound` is a
//! plain enum rather than a trait object.

use std::collections::HashMap;

use rustc_hash::FxHashSet;

use crate::cell::Cell;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, Float, V3};

/// A rectangular bound in `x`/`y` (2D grids leave `z` at zero).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RectBound {
    pub min: (i32, i32),
    pub max: (i32, i32),
}

/// A cuboid bound in `x`/`y`/`z`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CubeBound {
    pub min: (i32, i32, i32),
    pub max: (i32, i32, i32),
}

/// A float-extent bound, used for grids whose cell centres are at half-integer
/// offsets (spec §4.2).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AabbBound {
    pub min: V3,
    pub max: V3,
    pub is_3d: bool,
}

/// A hash-set-backed bound over an explicit set of cells.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MaskBound {
    cells: FxHashSet<Cell>,
}

impl MaskBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    pub fn add(&mut self, cell: Cell) {
        self.cells.insert(cell);
    }

    pub fn remove(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}

/// A predicate+enumerator for a cell subset (spec §4.2).
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Bound {
    Rect(RectBound),
    Cube(CubeBound),
    Aabb(AabbBound),
    Mask(MaskBound),
}

impl Bound {
    pub fn rect(min: (i32, i32), max: (i32, i32)) -> Self {
        Bound::Rect(RectBound { min, max })
    }

    pub fn cube(min: (i32, i32, i32), max: (i32, i32, i32)) -> Self {
        Bound::Cube(CubeBound { min, max })
    }

    pub fn aabb2d(min: V3, max: V3) -> Self {
        Bound::Aabb(AabbBound { min, max, is_3d: false })
    }

    pub fn aabb3d(min: V3, max: V3) -> Self {
        Bound::Aabb(AabbBound { min, max, is_3d: true })
    }

    pub fn mask(cells: impl IntoIterator<Item = Cell>) -> Self {
        Bound::Mask(MaskBound::from_cells(cells))
    }

    pub fn contains(&self, cell: Cell) -> bool {
        match self {
            Bound::Rect(r) => {
                cell.z == 0
                    && (r.min.0..=r.max.0).contains(&cell.x)
                    && (r.min.1..=r.max.1).contains(&cell.y)
            }
            Bound::Cube(c) => {
                (c.min.0..=c.max.0).contains(&cell.x)
                    && (c.min.1..=c.max.1).contains(&cell.y)
                    && (c.min.2..=c.max.2).contains(&cell.z)
            }
            Bound::Aabb(a) => {
                let p = V3::new(cell.x as Float + 0.5, cell.y as Float + 0.5, if a.is_3d {
                    cell.z as Float + 0.5
                } else {
                    0.0
                });
                Aabb::new(a.min, a.max).contains_point(p)
            }
            Bound::Mask(m) => m.contains(cell),
        }
    }

    /// Is this bound variant finite (and thus enumerable via [`Bound::get_cells`])?
    pub fn is_finite(&self) -> bool {
        true
    }

    /// Enumerates every cell in the bound, axis-ordered `z`-outer, `y`, `x`-inner
    /// (spec §4.2).
    pub fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        match self {
            Bound::Rect(r) => {
                let mut out = Vec::with_capacity(self.cell_count()? as usize);
                for y in r.min.1..=r.max.1 {
                    for x in r.min.0..=r.max.0 {
                        out.push(Cell::new2(x, y));
                    }
                }
                Ok(out)
            }
            Bound::Cube(c) => {
                let mut out = Vec::with_capacity(self.cell_count()? as usize);
                for z in c.min.2..=c.max.2 {
                    for y in c.min.1..=c.max.1 {
                        for x in c.min.0..=c.max.0 {
                            out.push(Cell::new(x, y, z));
                        }
                    }
                }
                Ok(out)
            }
            Bound::Aabb(a) => {
                let (xmin, xmax) = (a.min.x.floor() as i32, a.max.x.ceil() as i32 - 1);
                let (ymin, ymax) = (a.min.y.floor() as i32, a.max.y.ceil() as i32 - 1);
                let (zmin, zmax) = if a.is_3d {
                    (a.min.z.floor() as i32, a.max.z.ceil() as i32 - 1)
                } else {
                    (0, 0)
                };
                let mut out = Vec::new();
                for z in zmin..=zmax {
                    for y in ymin..=ymax {
                        for x in xmin..=xmax {
                            let cell = Cell::new(x, y, z);
                            if self.contains(cell) {
                                out.push(cell);
                            }
                        }
                    }
                }
                Ok(out)
            }
            Bound::Mask(m) => Ok(m.iter().collect()),
        }
    }

    /// `Π(max - min + 1)` with overflow check (spec §4.2).
    pub fn cell_count(&self) -> SylvesResult<i64> {
        match self {
            Bound::Rect(r) => {
                let dx = (r.max.0 - r.min.0 + 1) as i64;
                let dy = (r.max.1 - r.min.1 + 1) as i64;
                dx.checked_mul(dy).ok_or(SylvesError::OutOfMemory)
            }
            Bound::Cube(c) => {
                let dx = (c.max.0 - c.min.0 + 1) as i64;
                let dy = (c.max.1 - c.min.1 + 1) as i64;
                let dz = (c.max.2 - c.min.2 + 1) as i64;
                dx.checked_mul(dy)
                    .and_then(|v| v.checked_mul(dz))
                    .ok_or(SylvesError::OutOfMemory)
            }
            Bound::Aabb(_) => Ok(self.get_cells()?.len() as i64),
            Bound::Mask(m) => Ok(m.len() as i64),
        }
    }

    pub fn get_rect(&self) -> SylvesResult<RectBound> {
        match self {
            Bound::Rect(r) => Ok(*r),
            Bound::Mask(m) => rect_from_cells(m.iter(), false),
            _ => Err(SylvesError::NotSupported),
        }
    }

    pub fn get_cube(&self) -> SylvesResult<CubeBound> {
        match self {
            Bound::Cube(c) => Ok(*c),
            Bound::Mask(m) => cube_from_cells(m.iter()),
            _ => Err(SylvesError::NotSupported),
        }
    }

    /// Binary intersection; requires matching variants (spec §4.2).
    pub fn intersect(&self, other: &Bound) -> SylvesResult<Bound> {
        match (self, other) {
            (Bound::Rect(a), Bound::Rect(b)) => Ok(Bound::Rect(RectBound {
                min: (a.min.0.max(b.min.0), a.min.1.max(b.min.1)),
                max: (a.max.0.min(b.max.0), a.max.1.min(b.max.1)),
            })),
            (Bound::Cube(a), Bound::Cube(b)) => Ok(Bound::Cube(CubeBound {
                min: (a.min.0.max(b.min.0), a.min.1.max(b.min.1), a.min.2.max(b.min.2)),
                max: (a.max.0.min(b.max.0), a.max.1.min(b.max.1), a.max.2.min(b.max.2)),
            })),
            (Bound::Mask(a), Bound::Mask(b)) => Ok(Bound::Mask(MaskBound::from_cells(
                a.iter().filter(|c| b.contains(*c)),
            ))),
            (Bound::Aabb(a), Bound::Aabb(b)) if a.is_3d == b.is_3d => {
                Ok(Bound::Aabb(AabbBound {
                    min: V3::new(a.min.x.max(b.min.x), a.min.y.max(b.min.y), a.min.z.max(b.min.z)),
                    max: V3::new(a.max.x.min(b.max.x), a.max.y.min(b.max.y), a.max.z.min(b.max.z)),
                    is_3d: a.is_3d,
                }))
            }
            _ => Err(SylvesError::NotSupported),
        }
    }

    /// Binary union; requires matching variants (spec §4.2).
    pub fn union(&self, other: &Bound) -> SylvesResult<Bound> {
        match (self, other) {
            (Bound::Rect(a), Bound::Rect(b)) => Ok(Bound::Rect(RectBound {
                min: (a.min.0.min(b.min.0), a.min.1.min(b.min.1)),
                max: (a.max.0.max(b.max.0), a.max.1.max(b.max.1)),
            })),
            (Bound::Cube(a), Bound::Cube(b)) => Ok(Bound::Cube(CubeBound {
                min: (a.min.0.min(b.min.0), a.min.1.min(b.min.1), a.min.2.min(b.min.2)),
                max: (a.max.0.max(b.max.0), a.max.1.max(b.max.1), a.max.2.max(b.max.2)),
            })),
            (Bound::Mask(a), Bound::Mask(b)) => {
                let mut merged = a.clone();
                for c in b.iter() {
                    merged.add(c);
                }
                Ok(Bound::Mask(merged))
            }
            (Bound::Aabb(a), Bound::Aabb(b)) if a.is_3d == b.is_3d => {
                Ok(Bound::Aabb(AabbBound {
                    min: V3::new(a.min.x.min(b.min.x), a.min.y.min(b.min.y), a.min.z.min(b.min.z)),
                    max: V3::new(a.max.x.max(b.max.x), a.max.y.max(b.max.y), a.max.z.max(b.max.z)),
                    is_3d: a.is_3d,
                }))
            }
            _ => Err(SylvesError::NotSupported),
        }
    }
}

fn rect_from_cells(cells: impl Iterator<Item = Cell>, _unused: bool) -> SylvesResult<RectBound> {
    let mut iter = cells.peekable();
    let first = iter.peek().copied().ok_or(SylvesError::InvalidState)?;
    let (mut min, mut max) = ((first.x, first.y), (first.x, first.y));
    for c in iter {
        min = (min.0.min(c.x), min.1.min(c.y));
        max = (max.0.max(c.x), max.1.max(c.y));
    }
    Ok(RectBound { min, max })
}

fn cube_from_cells(cells: impl Iterator<Item = Cell>) -> SylvesResult<CubeBound> {
    let mut iter = cells.peekable();
    let first = iter.peek().copied().ok_or(SylvesError::InvalidState)?;
    let (mut min, mut max) = ((first.x, first.y, first.z), (first.x, first.y, first.z));
    for c in iter {
        min = (min.0.min(c.x), min.1.min(c.y), min.2.min(c.z));
        max = (max.0.max(c.x), max.1.max(c.y), max.2.max(c.z));
    }
    Ok(CubeBound { min, max })
}

/// Derives a combining hash for a cell, used by caches keyed on cell coordinates
/// (spec §4.2, §5).
pub fn combine_hash(cell: Cell) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = rustc_hash::FxHasher::default();
    cell.hash(&mut hasher);
    hasher.finish()
}

/// Placeholder for future per-cache LRU bookkeeping keyed by [`combine_hash`]; kept
/// here rather than in `cache` so callers hashing cells for their own structures can
/// reuse the same function without an extra dependency edge.
pub type CellHashMap<V> = HashMap<Cell, V, std::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_cell_count_and_membership() {
        let b = Bound::rect((0, 0), (2, 1));
        assert_eq!(b.cell_count().unwrap(), 6);
        assert!(b.contains(Cell::new2(0, 0)));
        assert!(!b.contains(Cell::new2(3, 0)));
        assert_eq!(b.get_cells().unwrap().len(), 6);
    }

    #[test]
    fn mask_add_remove() {
        let mut m = MaskBound::new();
        m.add(Cell::new2(1, 1));
        assert!(m.contains(Cell::new2(1, 1)));
        m.remove(Cell::new2(1, 1));
        assert!(!m.contains(Cell::new2(1, 1)));
    }

    #[test]
    fn intersect_requires_matching_variant() {
        let rect = Bound::rect((0, 0), (1, 1));
        let mask = Bound::mask([Cell::new2(0, 0)]);
        assert_eq!(rect.intersect(&mask).unwrap_err(), SylvesError::NotSupported);
    }
}
