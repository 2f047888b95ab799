//! Mesh storage with submeshes and n-gon encoding, half-edge adjacency, Delaunay
//! triangulation, and dual-mesh construction (spec §4.4).

mod delaunay;
mod dual;
mod half_edge;

pub use delaunay::{delaunay_triangulate, DelaunayResult, Point2};
pub use dual::{build_dual_mesh, DualMapping, DualMeshResult};
pub use half_edge::{HalfEdge, HalfEdgeId, HalfEdgeMap};

use crate::error::{SylvesError, SylvesResult};
use crate::math::V3;

/// How a submesh's flat index buffer is interpreted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MeshTopology {
    Triangles,
    Quads,
    /// Arbitrary polygons; the last vertex index of each face is stored as the
    /// bitwise complement of the true index (the "NGon sentinel", spec §3/§4.4).
    NGon,
}

/// A single submesh: a flat index buffer plus the topology used to interpret it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Submesh {
    indices: Vec<i32>,
    topology: Option<MeshTopology>,
}

impl Submesh {
    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    pub fn topology(&self) -> Option<MeshTopology> {
        self.topology
    }

    /// Iterates over the faces of this submesh, yielding the (real, decoded) vertex
    /// indices of each face.
    pub fn faces(&self) -> FaceIter<'_> {
        FaceIter {
            indices: &self.indices,
            topology: self.topology,
            pos: 0,
        }
    }
}

/// Iterates the faces of a submesh, hiding the NGon sentinel encoding from callers
/// (spec §9 Design Notes).
pub struct FaceIter<'a> {
    indices: &'a [i32],
    topology: Option<MeshTopology>,
    pos: usize,
}

impl<'a> Iterator for FaceIter<'a> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.topology? {
            MeshTopology::Triangles => {
                if self.pos + 3 > self.indices.len() {
                    return None;
                }
                let face = self.indices[self.pos..self.pos + 3]
                    .iter()
                    .map(|&i| i as u32)
                    .collect();
                self.pos += 3;
                Some(face)
            }
            MeshTopology::Quads => {
                if self.pos + 4 > self.indices.len() {
                    return None;
                }
                let face = self.indices[self.pos..self.pos + 4]
                    .iter()
                    .map(|&i| i as u32)
                    .collect();
                self.pos += 4;
                Some(face)
            }
            MeshTopology::NGon => {
                if self.pos >= self.indices.len() {
                    return None;
                }
                let mut face = Vec::new();
                while self.pos < self.indices.len() {
                    let raw = self.indices[self.pos];
                    self.pos += 1;
                    if raw < 0 {
                        face.push(!raw as u32);
                        return Some(face);
                    } else {
                        face.push(raw as u32);
                    }
                }
                // Ran off the end without a sentinel: malformed, but we return what
                // we have rather than panicking (errors belong to the setter, per
                // spec §4.4's "Submesh write contract").
                Some(face)
            }
        }
    }
}

/// Per-vertex attribute buffers, stored separately from positions as in the
/// source (spec §3).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexAttributes {
    pub normals: Option<Vec<V3>>,
    pub uvs: Option<Vec<V3>>,
    pub tangents: Option<Vec<V3>>,
}

/// Vertices plus submeshes (spec §3).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    vertices: Vec<V3>,
    submeshes: Vec<Submesh>,
    pub attributes: VertexAttributes,
    half_edges: Option<HalfEdgeMap>,
}

impl MeshData {
    pub fn new(vertices: Vec<V3>) -> Self {
        Self {
            vertices,
            submeshes: Vec::new(),
            attributes: VertexAttributes::default(),
            half_edges: None,
        }
    }

    pub fn vertices(&self) -> &[V3] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [V3] {
        &mut self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Takes ownership of a copy of `indices` as submesh `i` (spec §4.4's "Submesh
    /// write contract"). For `NGon`, validates that at least one sentinel exists and
    /// that every sentinel is followed by a new face start or EOF.
    pub fn set_submesh(
        &mut self,
        i: usize,
        indices: &[i32],
        topology: MeshTopology,
    ) -> SylvesResult<()> {
        for &idx in indices {
            let real = if idx < 0 { !idx } else { idx };
            if real < 0 || real as usize >= self.vertices.len() {
                return Err(SylvesError::OutOfBounds);
            }
        }
        if topology == MeshTopology::NGon {
            let has_sentinel = indices.iter().any(|&idx| idx < 0);
            if !indices.is_empty() && !has_sentinel {
                return Err(SylvesError::InvalidArgument);
            }
        }
        if topology == MeshTopology::Triangles && indices.len() % 3 != 0 {
            return Err(SylvesError::InvalidArgument);
        }
        if topology == MeshTopology::Quads && indices.len() % 4 != 0 {
            return Err(SylvesError::InvalidArgument);
        }
        while self.submeshes.len() <= i {
            self.submeshes.push(Submesh::default());
        }
        self.submeshes[i] = Submesh {
            indices: indices.to_vec(),
            topology: Some(topology),
        };
        self.half_edges = None;
        Ok(())
    }

    /// Appends a new submesh, returning its index.
    pub fn add_submesh(&mut self, indices: &[i32], topology: MeshTopology) -> SylvesResult<usize> {
        let i = self.submeshes.len();
        self.submeshes.push(Submesh::default());
        self.set_submesh(i, indices, topology)?;
        Ok(i)
    }

    /// Every face across every submesh, as `(submesh_index, face_index, vertex indices)`.
    pub fn faces(&self) -> impl Iterator<Item = (usize, usize, Vec<u32>)> + '_ {
        self.submeshes.iter().enumerate().flat_map(|(si, sm)| {
            sm.faces()
                .enumerate()
                .map(move |(fi, face)| (si, fi, face))
        })
    }

    /// Builds (or returns the cached) half-edge map (spec §4.4).
    pub fn half_edge_map(&mut self) -> &HalfEdgeMap {
        if self.half_edges.is_none() {
            self.half_edges = Some(HalfEdgeMap::build(self));
        }
        self.half_edges.as_ref().unwrap()
    }

    /// Like [`MeshData::half_edge_map`] but does not cache, for use through a shared
    /// reference.
    pub fn compute_half_edge_map(&self) -> HalfEdgeMap {
        HalfEdgeMap::build(self)
    }

    pub fn has_non_manifold_edges(&self) -> bool {
        self.compute_half_edge_map().has_non_manifold_edges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> MeshData {
        let mut mesh = MeshData::new(vec![
            V3::new(0.0, 0.0, 0.0),
            V3::new(1.0, 0.0, 0.0),
            V3::new(1.0, 1.0, 0.0),
            V3::new(0.0, 1.0, 0.0),
        ]);
        mesh.set_submesh(0, &[0, 1, !2], MeshTopology::NGon).unwrap();
        mesh.add_submesh(&[0, 2, !3], MeshTopology::NGon).unwrap();
        mesh
    }

    #[test]
    fn ngon_face_iteration_decodes_sentinel() {
        let mesh = quad_mesh();
        let faces: Vec<_> = mesh.faces().map(|(_, _, f)| f).collect();
        assert_eq!(faces, vec![vec![0, 1, 2], vec![0, 2, 3]]);
    }

    #[test]
    fn set_submesh_rejects_out_of_range_index() {
        let mut mesh = MeshData::new(vec![V3::new(0.0, 0.0, 0.0)]);
        let err = mesh.set_submesh(0, &[0, 1, !2], MeshTopology::NGon).unwrap_err();
        assert_eq!(err, SylvesError::OutOfBounds);
    }

    #[test]
    fn set_submesh_rejects_ngon_without_sentinel() {
        let mut mesh = MeshData::new(vec![V3::new(0.0, 0.0, 0.0), V3::new(1.0, 0.0, 0.0)]);
        let err = mesh.set_submesh(0, &[0, 1], MeshTopology::NGon).unwrap_err();
        assert_eq!(err, SylvesError::InvalidArgument);
    }
}
