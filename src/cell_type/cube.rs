//! The cube cell type's small rotation table: four 90-degree rotations about the
//! Z axis, matching the reference source's scope (spec §4.1: "a full 24-element
//! group is a natural extension but is out of scope").
//!
//! Direction indices are `[+X, -X, +Y, -Y, +Z, -Z] = [0, 1, 2, 3, 4, 5]`; the Z faces
//! are fixed points of every rotation in this table.

use crate::cell::{CellCorner, CellDir, CellRotation};
use crate::error::{SylvesError, SylvesResult};
use crate::math::Matrix;
use cgmath::{Matrix4, Rad};

pub const CUBE_ROTATIONS: [CellRotation; 4] = [
    CellRotation::rotation(0),
    CellRotation::rotation(1),
    CellRotation::rotation(2),
    CellRotation::rotation(3),
];

const HORIZ_DIRS: [CellDir; 4] = [0, 2, 1, 3];

fn horiz_pos(dir: CellDir) -> Option<usize> {
    HORIZ_DIRS.iter().position(|&d| d == dir)
}

pub fn rotate_dir(dir: CellDir, r: CellRotation) -> CellDir {
    match horiz_pos(dir) {
        Some(pos) => HORIZ_DIRS[(pos as i32 + r.0).rem_euclid(4) as usize],
        None => dir,
    }
}

const HORIZ_CORNER_BITS: [(u32, u32); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

pub fn rotate_corner(corner: CellCorner, r: CellRotation) -> CellCorner {
    let bit_x = corner & 1;
    let bit_y = (corner >> 1) & 1;
    let bit_z = corner & 4;
    let pos = HORIZ_CORNER_BITS
        .iter()
        .position(|&(x, y)| x == bit_x && y == bit_y)
        .expect("corner bits always present in table");
    let (nx, ny) = HORIZ_CORNER_BITS[(pos as i32 + r.0).rem_euclid(4) as usize];
    nx | (ny << 1) | bit_z
}

pub fn multiply(a: CellRotation, b: CellRotation) -> CellRotation {
    CellRotation::rotation((a.0 + b.0).rem_euclid(4))
}

pub fn invert(r: CellRotation) -> CellRotation {
    CellRotation::rotation((-r.0).rem_euclid(4))
}

pub fn try_get_rotation(from: CellDir, to: CellDir) -> SylvesResult<CellRotation> {
    if from == to {
        return Ok(CellRotation::IDENTITY);
    }
    match (horiz_pos(from), horiz_pos(to)) {
        (Some(pf), Some(pt)) => Ok(CellRotation::rotation((pt as i32 - pf as i32).rem_euclid(4))),
        _ => Err(SylvesError::NotSupported),
    }
}

pub fn rotation_matrix(r: CellRotation) -> Matrix {
    let k = r.rotation_amount();
    Matrix4::from_angle_z(Rad(std::f64::consts::FRAC_PI_2 * k as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_faces_are_fixed() {
        for &r in &CUBE_ROTATIONS {
            assert_eq!(rotate_dir(4, r), 4);
            assert_eq!(rotate_dir(5, r), 5);
        }
    }

    #[test]
    fn connection_round_trip() {
        for &r in &CUBE_ROTATIONS {
            let from = 0;
            let to = rotate_dir(from, r);
            let solved = try_get_rotation(from, to).unwrap();
            assert_eq!(rotate_dir(from, solved), to);
        }
    }
}
