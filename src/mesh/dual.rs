//! Dual mesh construction (spec §4.6): faces become vertices, vertices become faces.

use cgmath::{EuclideanSpace, InnerSpace};

use crate::error::{SylvesError, SylvesResult};
use crate::math::{Float, DEFAULT_FAR_VERTEX_THRESHOLD, V3};

use super::half_edge::{HalfEdgeId, HalfEdgeMap};
use super::{MeshData, MeshTopology};

/// Records which dual-mesh vertex a given primal `(face, vertex)` corner projects
/// to, so per-corner attributes can be carried over (spec §4.6).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DualMapping {
    pub primal_face: usize,
    pub primal_vertex: usize,
    pub dual_face: usize,
    pub dual_vertex_index: usize,
}

/// Output of [`build_dual_mesh`].
#[derive(Clone, Debug)]
pub struct DualMeshResult {
    pub mesh: MeshData,
    pub mappings: Vec<DualMapping>,
}

fn face_centroid(mesh: &MeshData, face_verts: &[u32]) -> V3 {
    let sum = face_verts
        .iter()
        .fold(V3::new(0.0, 0.0, 0.0), |acc, &v| acc + mesh.vertices()[v as usize].to_vec());
    sum / face_verts.len() as Float
}

struct PrimalFaces {
    /// `faces[f]` is the ordered vertex list of primal face `f`.
    faces: Vec<Vec<u32>>,
    centroids: Vec<V3>,
}

fn collect_faces(mesh: &MeshData) -> PrimalFaces {
    let faces: Vec<Vec<u32>> = mesh.faces().map(|(_, _, verts)| verts).collect();
    let centroids = faces.iter().map(|f| face_centroid(mesh, f)).collect();
    PrimalFaces { faces, centroids }
}

/// A half-edge with `src == v`, found by scanning, naming the face it belongs to.
fn outgoing_half_edges(hem: &HalfEdgeMap, faces: &[Vec<u32>], v: u32) -> Vec<HalfEdgeId> {
    let mut out = Vec::new();
    for (face_index, verts) in faces.iter().enumerate() {
        for edge_index in 0..verts.len() {
            if verts[edge_index] == v {
                out.push((face_index, edge_index));
            }
        }
    }
    // Keep only entries actually present in the half-edge map (defensive).
    out.into_iter().filter(|id| hem.get(*id).is_some()).collect()
}

/// Walks the cycle of faces around vertex `v`, starting at `start` (a half-edge with
/// `src == v`), in the direction of repeated rotate-then-flip (spec §4.6). Returns
/// the visited face indices in walk order and whether the walk closed (returned to
/// `start`) or hit a boundary.
fn walk_faces_around_vertex(
    hem: &HalfEdgeMap,
    start: HalfEdgeId,
) -> (Vec<usize>, bool) {
    let mut visited = Vec::new();
    let mut current = start;
    loop {
        visited.push(current.0);
        let he = hem.get(current).expect("half-edge exists");
        let prev = he.prev_in_face();
        let prev_he = hem.get(prev).expect("half-edge exists");
        match prev_he.flip {
            None => return (visited, false),
            Some(flipped) => {
                if flipped == start {
                    return (visited, true);
                }
                current = flipped;
                if current == start {
                    return (visited, true);
                }
            }
        }
    }
}

/// Builds the dual of a primal mesh (spec §4.6). The primal mesh must have a single
/// submesh; any topology is accepted (triangles/quads are n-gons for this purpose).
pub fn build_dual_mesh(primal: &mut MeshData, far_vertex_threshold: Float) -> SylvesResult<DualMeshResult> {
    if primal.submesh_count() != 1 {
        return Err(SylvesError::NotSupported);
    }
    if primal.has_non_manifold_edges() {
        return Err(SylvesError::NotSupported);
    }

    let hem = primal.half_edge_map().clone();
    let PrimalFaces { faces, centroids } = collect_faces(primal);

    let vp = primal.vertex_count();
    let fp = faces.len();

    // New vertex buffer: primal vertices (kept verbatim, spec §4.6) then centroids,
    // with far vertices appended as boundary walks need them.
    let mut new_vertices: Vec<V3> = primal.vertices().to_vec();
    new_vertices.extend_from_slice(&centroids);
    let centroid_index = |face: usize| (vp + face) as u32;

    let mut dual_faces: Vec<Vec<u32>> = Vec::new();
    let mut mappings = Vec::new();

    for v in 0..vp as u32 {
        let outgoing = outgoing_half_edges(&hem, &faces, v);
        if outgoing.is_empty() {
            continue;
        }
        if primal.vertices()[v as usize].to_vec().x.abs() > far_vertex_threshold
            || primal.vertices()[v as usize].to_vec().y.abs() > far_vertex_threshold
            || primal.vertices()[v as usize].to_vec().z.abs() > far_vertex_threshold
        {
            // Already-at-infinity primal vertices do not get a dual face.
            continue;
        }

        let start = outgoing[0];
        let (forward_faces, closed) = walk_faces_around_vertex(&hem, start);

        let dual_face_index = dual_faces.len();
        let mut polygon: Vec<u32> = Vec::new();

        if closed {
            for &f in &forward_faces {
                polygon.push(centroid_index(f));
                mappings.push(DualMapping {
                    primal_face: f,
                    primal_vertex: v as usize,
                    dual_face: dual_face_index,
                    dual_vertex_index: centroid_index(f) as usize,
                });
            }
        } else {
            // Open arc: also walk the reverse rotation direction from `start` to
            // pick up faces on the other side of the boundary, then close the
            // polygon with two synthetic far vertices (spec §4.6).
            let mut backward_faces = Vec::new();
            {
                // Reverse direction: rotate by following `flip` first, then
                // `next_in_face`, mirroring the forward walk's rotate-then-flip.
                let mut current = start;
                loop {
                    let he = hem.get(current).expect("half-edge exists");
                    match he.flip {
                        None => break,
                        Some(flipped) => {
                            let flipped_he = hem.get(flipped).expect("half-edge exists");
                            let next = flipped_he.next_in_face();
                            backward_faces.push(next.0);
                            current = next;
                        }
                    }
                }
            }

            let far = |boundary_face: usize| -> V3 {
                let p = primal.vertices()[v as usize];
                let c = centroids[boundary_face];
                let dir = (p.to_vec() - (c.to_vec())).normalize();
                V3::from_vec(p.to_vec() + dir * far_vertex_threshold.min(DEFAULT_FAR_VERTEX_THRESHOLD))
            };

            if let Some(&last_backward) = backward_faces.last() {
                let far_start_idx = new_vertices.len() as u32;
                new_vertices.push(far(last_backward));
                polygon.push(far_start_idx);
            }

            for &f in backward_faces.iter().rev() {
                polygon.push(centroid_index(f));
                mappings.push(DualMapping {
                    primal_face: f,
                    primal_vertex: v as usize,
                    dual_face: dual_face_index,
                    dual_vertex_index: centroid_index(f) as usize,
                });
            }
            for &f in &forward_faces {
                polygon.push(centroid_index(f));
                mappings.push(DualMapping {
                    primal_face: f,
                    primal_vertex: v as usize,
                    dual_face: dual_face_index,
                    dual_vertex_index: centroid_index(f) as usize,
                });
            }

            if let Some(&last_forward) = forward_faces.last() {
                let far_end_idx = new_vertices.len() as u32;
                new_vertices.push(far(last_forward));
                polygon.push(far_end_idx);
            }
        }

        if polygon.len() >= 3 {
            dual_faces.push(polygon);
        }
    }

    let mut dual_mesh = MeshData::new(new_vertices);
    let mut flat = Vec::new();
    for face in &dual_faces {
        for (i, &v) in face.iter().enumerate() {
            if i + 1 == face.len() {
                flat.push(!(v as i32));
            } else {
                flat.push(v as i32);
            }
        }
    }
    dual_mesh.set_submesh(0, &flat, MeshTopology::NGon)?;
    let _ = fp;

    Ok(DualMeshResult {
        mesh: dual_mesh,
        mappings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::V3;

    /// One hex and its 6 neighbours, as a 7-face fan already triangulated into the
    /// wedges a hex-grid mesh grid would produce: this exercises the "closed"
    /// (interior-vertex) branch of the dual walk.
    #[test]
    fn dual_of_hex_fan_closes_around_center() {
        // Centre hexagon's 6 corners plus the 6 outer points, forming 6 quads
        // fanned around the shared centre-ish vertex 0.
        let mut verts = vec![V3::new(0.0, 0.0, 0.0)];
        for k in 0..6 {
            let a = (k as f64) * std::f64::consts::PI / 3.0;
            verts.push(V3::new(a.cos(), a.sin(), 0.0));
        }
        let mut mesh = MeshData::new(verts);
        let mut indices = Vec::new();
        for k in 0..6u32 {
            let a = 1 + k;
            let b = 1 + (k + 1) % 6;
            indices.push(0);
            indices.push(a as i32);
            indices.push(!(b as i32));
        }
        mesh.set_submesh(0, &indices, MeshTopology::NGon).unwrap();
        assert!(!mesh.has_non_manifold_edges());

        let result = build_dual_mesh(&mut mesh, DEFAULT_FAR_VERTEX_THRESHOLD).unwrap();
        // Vertex 0 (the hub) should produce a closed hexagonal dual face.
        assert!(result
            .mesh
            .submeshes()
            .first()
            .map(|sm| sm.faces().any(|f| f.len() == 6))
            .unwrap_or(false));
    }
}
