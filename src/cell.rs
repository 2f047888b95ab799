//! The coordinate and index types that name cells, directions, corners and the
//! symmetry group elements relating neighbouring cells (spec §3).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer triple identifying a grid element.
///
/// Interpretation is grid-specific; 2D grids leave `z` at zero. Equality is
/// component-wise.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn new2(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Cell {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Cell::new(x, y, z)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new2(x, y)
    }
}

/// A non-negative index into the finite direction set of a cell's [`crate::cell_type::CellType`].
pub type CellDir = u32;

/// A non-negative index into the finite corner set of a cell's [`crate::cell_type::CellType`].
pub type CellCorner = u32;

/// An element of a cell's symmetry group (rotations and reflections).
///
/// Rotations are non-negative; reflections are encoded as the bitwise complement
/// of a rotation index (`!k`), exactly as in the source this crate is derived from
/// (spec §3, §9 Design Notes). Identity is `0`.
///
/// Use [`CellRotation::rotation_amount`]/[`CellRotation::is_reflection`] rather than
/// matching on the sign bit directly; the [`RotationOrReflection`] view gives a
/// conventional two-case enum for callers who prefer it.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellRotation(pub i32);

impl CellRotation {
    pub const IDENTITY: CellRotation = CellRotation(0);

    /// Constructs a pure-rotation element.
    #[inline]
    pub const fn rotation(k: i32) -> Self {
        CellRotation(k)
    }

    /// Constructs a reflection element, i.e. the rotation-then-mirror `!k`.
    #[inline]
    pub const fn reflection(k: i32) -> Self {
        CellRotation(!k)
    }

    #[inline]
    pub const fn is_reflection(self) -> bool {
        self.0 < 0
    }

    /// The rotation amount: `k` for a pure rotation `k`, or the underlying `k` for
    /// a reflection `!k`.
    #[inline]
    pub const fn rotation_amount(self) -> i32 {
        if self.0 < 0 {
            !self.0
        } else {
            self.0
        }
    }

    #[inline]
    pub fn as_view(self) -> RotationOrReflection {
        if self.is_reflection() {
            RotationOrReflection::Reflection(self.rotation_amount())
        } else {
            RotationOrReflection::Rotation(self.rotation_amount())
        }
    }
}

impl fmt::Debug for CellRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_view() {
            RotationOrReflection::Rotation(k) => write!(f, "Rotation({k})"),
            RotationOrReflection::Reflection(k) => write!(f, "Reflection({k})"),
        }
    }
}

/// A conventional two-case view of a [`CellRotation`] (spec §9 Design Notes:
/// "Encoded rotations ... must become a tagged variant").
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RotationOrReflection {
    Rotation(i32),
    Reflection(i32),
}

/// How the local frame of a neighbour relates to the local frame of the cell a
/// move originated from.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connection {
    pub rotation: CellRotation,
    pub is_mirror: bool,
}

impl Connection {
    pub const IDENTITY: Connection = Connection {
        rotation: CellRotation::IDENTITY,
        is_mirror: false,
    };

    /// The connection that, composed with this one in either order, yields
    /// [`Connection::IDENTITY`] under the owning `CellType`'s group law (spec §9:
    /// "re-derive `invert` from the CellType algebra for the variant").
    pub fn inverse(self, invert_rotation: impl Fn(CellRotation) -> CellRotation) -> Connection {
        // A mirror connection's full element is a reflection, which is its own
        // inverse under the owning CellType's group law; only the rotation amount
        // of a non-mirror connection needs inverting.
        let rotation = if self.is_mirror { self.rotation } else { invert_rotation(self.rotation) };
        Connection { rotation, is_mirror: self.is_mirror }
    }
}

/// A single step in a path: moving from `src` to `dest` via `dir`, with the
/// reciprocal direction and connection recorded so the step can be walked in
/// reverse (spec §3).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    pub src: Cell,
    pub dest: Cell,
    pub dir: CellDir,
    pub inverse_dir: CellDir,
    pub connection: Connection,
    pub length: f32,
}

impl Step {
    /// Swaps `src`/`dest`, `dir`/`inverse_dir`, and inverts the connection.
    /// An involution: `step_inverse(step_inverse(s)) == s`.
    pub fn inverse(self, invert_rotation: impl Fn(CellRotation) -> CellRotation) -> Step {
        Step {
            src: self.dest,
            dest: self.src,
            dir: self.inverse_dir,
            inverse_dir: self.dir,
            connection: self.connection.inverse(invert_rotation),
            length: self.length,
        }
    }
}

/// An ordered sequence of [`Step`]s, each chaining into the next
/// (`steps[i].dest == steps[i+1].src`).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellPath {
    pub steps: Vec<Step>,
}

impl CellPath {
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn source(&self) -> Option<Cell> {
        self.steps.first().map(|s| s.src)
    }

    pub fn target(&self) -> Option<Cell> {
        self.steps.last().map(|s| s.dest)
    }

    pub fn total_length(&self) -> f32 {
        self.steps.iter().map(|s| s.length).sum()
    }

    /// Checks the chaining invariant: `steps[i].dest == steps[i+1].src` for all `i`.
    pub fn is_well_formed(&self) -> bool {
        self.steps.windows(2).all(|w| w[0].dest == w[1].src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_encoding_roundtrip() {
        let r = CellRotation::rotation(3);
        assert!(!r.is_reflection());
        assert_eq!(r.rotation_amount(), 3);

        let m = CellRotation::reflection(3);
        assert!(m.is_reflection());
        assert_eq!(m.rotation_amount(), 3);
        assert_eq!(m.0, !3);
    }

    #[test]
    fn path_total_length_and_chaining() {
        let a = Cell::new2(0, 0);
        let b = Cell::new2(1, 0);
        let c = Cell::new2(2, 0);
        let path = CellPath {
            steps: vec![
                Step {
                    src: a,
                    dest: b,
                    dir: 0,
                    inverse_dir: 2,
                    connection: Connection::IDENTITY,
                    length: 1.0,
                },
                Step {
                    src: b,
                    dest: c,
                    dir: 0,
                    inverse_dir: 2,
                    connection: Connection::IDENTITY,
                    length: 1.5,
                },
            ],
        };
        assert!(path.is_well_formed());
        assert_eq!(path.total_length(), 2.5);
        assert_eq!(path.source(), Some(a));
        assert_eq!(path.target(), Some(c));
    }
}
