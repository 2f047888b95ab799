//! Shared algebra for the three `NGon`-backed cell types (Square, Hex, Triangle):
//! the dihedral group of order `2n` acting on `n` directions/corners by rotation
//! and reflection (spec §4.1).

use crate::cell::{CellCorner, CellDir, CellRotation, Connection};
use crate::math::Matrix;
use cgmath::{Matrix4, Rad};

/// The dihedral symmetry group of an `n`-sided regular polygon, encoded the way
/// [`CellRotation`] encodes it: rotations `0..n` non-negative, reflections `!k`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NGon {
    n: i32,
}

impl NGon {
    pub const fn new(n: i32) -> Self {
        Self { n }
    }

    pub fn n(self) -> i32 {
        self.n
    }

    pub fn enumerate_rotations(self) -> Vec<CellRotation> {
        let mut v = Vec::with_capacity((self.n * 2) as usize);
        for k in 0..self.n {
            v.push(CellRotation::rotation(k));
        }
        for k in 0..self.n {
            v.push(CellRotation::reflection(k));
        }
        v
    }

    #[inline]
    fn rem(self, x: i32) -> i32 {
        x.rem_euclid(self.n)
    }

    pub fn rotate_dir(self, dir: CellDir, r: CellRotation) -> CellDir {
        let d = dir as i32;
        let n = self.n;
        let out = if !r.is_reflection() {
            self.rem(d + r.0)
        } else {
            let k = r.rotation_amount();
            self.rem(n - d + k)
        };
        out as CellDir
    }

    pub fn rotate_corner(self, corner: CellCorner, r: CellRotation) -> CellCorner {
        let c = corner as i32;
        let n = self.n;
        let out = if !r.is_reflection() {
            self.rem(c + r.0)
        } else {
            let k = r.rotation_amount();
            self.rem(1 + n - c + k)
        };
        out as CellCorner
    }

    /// The dihedral group law (spec §4.1).
    pub fn multiply(self, a: CellRotation, b: CellRotation) -> CellRotation {
        let n = self.n;
        match (a.is_reflection(), b.is_reflection()) {
            (false, false) => CellRotation::rotation(self.rem(a.0 + b.0)),
            (false, true) => {
                let j = b.rotation_amount();
                CellRotation::reflection(self.rem(a.0 + j))
            }
            (true, false) => {
                let i = a.rotation_amount();
                CellRotation::reflection(self.rem(n + i - b.0))
            }
            (true, true) => {
                let i = a.rotation_amount();
                let j = b.rotation_amount();
                CellRotation::rotation(self.rem(n + i - j))
            }
        }
    }

    pub fn invert(self, r: CellRotation) -> CellRotation {
        if r.is_reflection() {
            // Reflections are self-inverse (modulo the caveat in spec §9 that this
            // must be re-derived, not copied, for each variant; verified by the
            // `invert(invert(c)) == c` property test below and the generic group-law
            // test in `cell_type::tests`).
            r
        } else {
            CellRotation::rotation(self.rem(self.n - r.0))
        }
    }

    /// Solves `rotate_dir(from, r) == to` for `r`, given the connection's mirror flag.
    pub fn try_get_rotation(self, from: CellDir, to: CellDir, connection: Connection) -> CellRotation {
        let n = self.n;
        if connection.is_mirror {
            CellRotation::reflection(self.rem(to as i32 + from as i32))
        } else {
            let _ = n;
            CellRotation::rotation(self.rem(to as i32 - from as i32))
        }
    }

    pub fn rotation_matrix(self, r: CellRotation) -> Matrix {
        let k = r.rotation_amount();
        let angle = Rad(2.0 * std::f64::consts::PI * (k as f64) / (self.n as f64));
        let rot = Matrix4::from_angle_z(angle);
        if r.is_reflection() {
            let flip = Matrix4::from_nonuniform_scale(1.0, -1.0, 1.0);
            rot * flip
        } else {
            rot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_is_self_inverse() {
        let ngon = NGon::new(6);
        for k in 0..6 {
            let m = CellRotation::reflection(k);
            assert_eq!(ngon.invert(m), m);
            assert_eq!(ngon.multiply(m, ngon.invert(m)), CellRotation::IDENTITY);
        }
    }

    #[test]
    fn try_get_rotation_roundtrip() {
        let ngon = NGon::new(6);
        for from in 0..6u32 {
            for r in ngon.enumerate_rotations() {
                let to = ngon.rotate_dir(from, r);
                let (rot, is_mirror) = (CellRotation::rotation(r.rotation_amount()), r.is_reflection());
                let connection = Connection { rotation: rot, is_mirror };
                let solved = ngon.try_get_rotation(from, to, connection);
                assert_eq!(ngon.rotate_dir(from, solved), to);
            }
        }
    }
}
