//! Half-edge adjacency over a [`super::MeshData`] (spec §4.4).

use std::collections::HashMap;

use super::MeshData;

/// Identifies a half-edge as `(face_index, edge_index)`, where `face_index` counts
/// faces across all submeshes in submesh order and `edge_index` is the index of the
/// edge's starting vertex within that face's vertex list.
pub type HalfEdgeId = (usize, usize);

/// A directed edge belonging to exactly one face, optionally paired with the
/// half-edge on the other side of the same undirected edge.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HalfEdge {
    pub id: HalfEdgeId,
    pub face_vertex_count: usize,
    pub src_vertex: u32,
    pub dest_vertex: u32,
    pub flip: Option<HalfEdgeId>,
}

impl HalfEdge {
    /// The half-edge immediately preceding this one within its face (wrapping).
    pub fn prev_in_face(self) -> HalfEdgeId {
        let (face, edge) = self.id;
        let n = self.face_vertex_count;
        (face, (edge + n - 1) % n)
    }

    /// The half-edge immediately following this one within its face (wrapping).
    pub fn next_in_face(self) -> HalfEdgeId {
        let (face, edge) = self.id;
        let n = self.face_vertex_count;
        (face, (edge + 1) % n)
    }
}

/// The full half-edge adjacency of a mesh, built by scanning every face once
/// (spec §4.4).
#[derive(Clone, Debug, Default)]
pub struct HalfEdgeMap {
    edges: HashMap<HalfEdgeId, HalfEdge>,
    non_manifold: bool,
}

impl HalfEdgeMap {
    pub fn build(mesh: &MeshData) -> Self {
        let mut edges = HashMap::new();
        // Canonical undirected-edge key -> the half-edges seen for it so far.
        let mut buckets: HashMap<(u32, u32), Vec<HalfEdgeId>> = HashMap::new();
        let mut face_vertex_lists: HashMap<usize, Vec<u32>> = HashMap::new();

        for (_, face_index, verts) in mesh.faces() {
            let n = verts.len();
            face_vertex_lists.insert(face_index, verts.clone());
            for edge_index in 0..n {
                let src = verts[edge_index];
                let dest = verts[(edge_index + 1) % n];
                let id = (face_index, edge_index);
                edges.insert(
                    id,
                    HalfEdge {
                        id,
                        face_vertex_count: n,
                        src_vertex: src,
                        dest_vertex: dest,
                        flip: None,
                    },
                );
                let key = (src.min(dest), src.max(dest));
                buckets.entry(key).or_default().push(id);
            }
        }

        let mut non_manifold = false;
        for ids in buckets.values() {
            if ids.len() > 2 {
                non_manifold = true;
                continue;
            }
            if ids.len() == 2 {
                let (a, b) = (ids[0], ids[1]);
                edges.get_mut(&a).unwrap().flip = Some(b);
                edges.get_mut(&b).unwrap().flip = Some(a);
            }
        }

        Self { edges, non_manifold }
    }

    pub fn get(&self, id: HalfEdgeId) -> Option<HalfEdge> {
        self.edges.get(&id).copied()
    }

    pub fn flip(&self, id: HalfEdgeId) -> Option<HalfEdgeId> {
        self.get(id).and_then(|he| he.flip)
    }

    pub fn has_non_manifold_edges(&self) -> bool {
        self.non_manifold
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HalfEdge> {
        self.edges.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::V3;
    use crate::mesh::MeshTopology;

    #[test]
    fn two_triangles_share_a_flipped_edge() {
        let mut mesh = MeshData::new(vec![
            V3::new(0.0, 0.0, 0.0),
            V3::new(1.0, 0.0, 0.0),
            V3::new(1.0, 1.0, 0.0),
            V3::new(0.0, 1.0, 0.0),
        ]);
        mesh.set_submesh(0, &[0, 1, 2, 0, 2, 3], MeshTopology::Triangles)
            .unwrap();
        let hem = mesh.compute_half_edge_map();
        assert!(!hem.has_non_manifold_edges());

        // Face 0 edge (2->0) is shared with face 1 edge (0->2).
        let he = hem.get((0, 2)).unwrap();
        assert_eq!((he.src_vertex, he.dest_vertex), (2, 0));
        let flip = hem.get(he.flip.unwrap()).unwrap();
        assert_eq!((flip.src_vertex, flip.dest_vertex), (0, 2));
    }

    #[test]
    fn boundary_edges_have_no_flip() {
        let mut mesh = MeshData::new(vec![
            V3::new(0.0, 0.0, 0.0),
            V3::new(1.0, 0.0, 0.0),
            V3::new(0.0, 1.0, 0.0),
        ]);
        mesh.set_submesh(0, &[0, 1, 2], MeshTopology::Triangles).unwrap();
        let hem = mesh.compute_half_edge_map();
        for i in 0..3 {
            assert!(hem.get((0, i)).unwrap().flip.is_none());
        }
    }
}
