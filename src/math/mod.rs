//! Vector/matrix math primitives.
//!
//! Sylves treats these as available with standard semantics (spec L0); this module
//! just fixes the concrete types used throughout the rest of the crate, following
//! the teacher's convention of building its data model atop `cgmath`.

use cgmath::{Matrix4, Point3, Vector3};

/// Coordinate type used for cell geometry (centers, corners, polygons).
pub type Float = f64;

/// A 3D point in world/geometry space.
pub type V3 = Point3<Float>;

/// A 3D vector (displacement) in world/geometry space.
pub type Vec3 = Vector3<Float>;

/// A 4x4 affine transform, used for [`crate::cell_type::CellType::rotation_matrix`] and
/// TRS composition.
pub type Matrix = Matrix4<Float>;

/// `2^-52`, the epsilon used by the Delaunay triangulator for duplicate-point
/// detection (spec §4.5).
pub const EPSILON: Float = 2.220446049250313e-16;

/// Default magnitude beyond which a dual-mesh vertex is treated as "at infinity"
/// (spec §4.6).
pub const DEFAULT_FAR_VERTEX_THRESHOLD: Float = 1e10;

/// An axis-aligned bounding box in world space, used by [`crate::grid::GridTrait::get_cell_aabb`]
/// and by [`crate::bound::Bound`]'s AABB variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: V3,
    pub max: V3,
}

impl Aabb {
    pub fn new(min: V3, max: V3) -> Self {
        Self { min, max }
    }

    pub fn contains_point(&self, p: V3) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: V3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: V3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }
}
