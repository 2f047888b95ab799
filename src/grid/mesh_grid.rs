//! A grid backed by an arbitrary polygonal mesh (spec §4.3, §4.4).

use std::any::Any;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, V3};
use crate::mesh::{HalfEdgeMap, MeshData};

use super::GridTrait;

/// A grid whose cells are the faces of a [`MeshData`] (spec §4.3: "mesh grids via
/// lookup into their MeshData and half-edge map"). `Cell.x` is the face's global
/// index across submeshes, in the order [`MeshData::faces`] yields them.
#[derive(Clone, Debug)]
pub struct MeshGrid {
    mesh: MeshData,
    half_edges: HalfEdgeMap,
    faces: Vec<Vec<u32>>,
}

impl MeshGrid {
    /// Takes ownership of a deep copy of `mesh` (spec §5: "Mesh grids own a deep
    /// copy of the mesh data they were constructed from").
    pub fn new(mesh: MeshData) -> Self {
        let half_edges = mesh.compute_half_edge_map();
        let faces = mesh.faces().map(|(_, _, verts)| verts).collect();
        Self { mesh, half_edges, faces }
    }

    fn face(&self, cell: Cell) -> Option<&Vec<u32>> {
        if cell.y != 0 || cell.z != 0 || cell.x < 0 {
            return None;
        }
        self.faces.get(cell.x as usize)
    }

    fn centroid(&self, face: &[u32]) -> V3 {
        let sum = face
            .iter()
            .fold((0.0, 0.0, 0.0), |(ax, ay, az), &v| {
                let p = self.mesh.vertices()[v as usize];
                (ax + p.x, ay + p.y, az + p.z)
            });
        let n = face.len() as f64;
        V3::new(sum.0 / n, sum.1 / n, sum.2 / n)
    }

    /// The closest [`CellType`] that matches a face's vertex count, used only as a
    /// convenience for callers that want a symmetry group to reason about; general
    /// n-gon faces outside {3, 4, 6} have no matching `CellType` (spec §3's `CellType`
    /// variant set is closed over the regular-tiling shapes).
    fn cell_type_for_len(len: usize) -> SylvesResult<CellType> {
        match len {
            3 => Ok(CellType::TriFT),
            4 => Ok(CellType::Square),
            6 => Ok(CellType::HexFT),
            _ => Err(SylvesError::NotSupported),
        }
    }
}

impl GridTrait for MeshGrid {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.face(cell).is_some()
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        let face = self.face(cell).ok_or(SylvesError::CellNotInGrid)?;
        Self::cell_type_for_len(face.len())
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        let face = self.face(cell).ok_or(SylvesError::CellNotInGrid)?;
        if dir as usize >= face.len() {
            return Err(SylvesError::InvalidDir);
        }
        let id = (cell.x as usize, dir as usize);
        let he = self.half_edges.get(id).ok_or(SylvesError::NotSupported)?;
        match he.flip {
            None => Ok(None),
            Some((face_index, edge_index)) => Ok(Some((
                Cell::new2(face_index as i32, 0),
                edge_index as CellDir,
                Connection::IDENTITY,
            ))),
        }
    }

    /// Overridden rather than using the default (which routes through
    /// [`GridTrait::get_cell_type`]): a face's direction count is simply its vertex
    /// count, whether or not that count matches a named `CellType`.
    fn get_cell_dirs(&self, cell: Cell) -> SylvesResult<Vec<CellDir>> {
        let face = self.face(cell).ok_or(SylvesError::CellNotInGrid)?;
        Ok((0..face.len() as CellDir).collect())
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        match self.face(cell) {
            Some(face) => self.centroid(face),
            None => {
                log::error!("get_cell_center called on cell {cell:?} not in mesh grid");
                V3::new(0.0, 0.0, 0.0)
            }
        }
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        match self.face(cell) {
            Some(face) => face.iter().map(|&v| self.mesh.vertices()[v as usize]).collect(),
            None => {
                log::error!("get_cell_corners called on cell {cell:?} not in mesh grid");
                Vec::new()
            }
        }
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        for (i, face) in self.faces.iter().enumerate() {
            let corners: Vec<V3> = face.iter().map(|&v| self.mesh.vertices()[v as usize]).collect();
            if polygon_contains(&corners, position) {
                return Some(Cell::new2(i as i32, 0));
            }
        }
        None
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        match self.face(cell) {
            Some(face) => {
                let mut iter = face.iter().map(|&v| self.mesh.vertices()[v as usize]);
                let first = iter.next().unwrap_or_else(|| V3::new(0.0, 0.0, 0.0));
                let mut aabb = Aabb::new(first, first);
                for p in iter {
                    aabb = aabb.union(&Aabb::new(p, p));
                }
                aabb
            }
            None => Aabb::new(V3::new(0.0, 0.0, 0.0), V3::new(0.0, 0.0, 0.0)),
        }
    }

    fn is_finite(&self) -> bool {
        true
    }

    fn is_2d(&self) -> bool {
        true
    }

    fn get_cell_count(&self) -> Option<i64> {
        Some(self.faces.len() as i64)
    }

    fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        Ok((0..self.faces.len() as i32).map(|i| Cell::new2(i, 0)).collect())
    }

    fn bound(&self) -> Option<&Bound> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Even-odd point-in-polygon test, projected onto the XY plane.
fn polygon_contains(corners: &[V3], p: V3) -> bool {
    let n = corners.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (corners[i].x, corners[i].y);
        let (xj, yj) = (corners[j].x, corners[j].y);
        if (yi > p.y) != (yj > p.y) && p.x < (xj - xi) * (p.y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshTopology;

    fn two_quads() -> MeshData {
        let mut mesh = MeshData::new(vec![
            V3::new(0.0, 0.0, 0.0),
            V3::new(1.0, 0.0, 0.0),
            V3::new(1.0, 1.0, 0.0),
            V3::new(0.0, 1.0, 0.0),
            V3::new(2.0, 0.0, 0.0),
            V3::new(2.0, 1.0, 0.0),
        ]);
        mesh.set_submesh(0, &[0, 1, 2, !3, 1, 4, 5, !2], MeshTopology::NGon).unwrap();
        mesh
    }

    #[test]
    fn adjacent_quads_are_reciprocal_neighbours() {
        let grid = MeshGrid::new(two_quads());
        assert_eq!(grid.get_cell_count(), Some(2));
        let a = Cell::new2(0, 0);
        // Edge 1 of face 0 is (1 -> 2), shared with face 1's edge 0 (1 -> 4)? No:
        // face 1 is [1, 4, 5, 2], so the shared undirected edge {1, 2} is face 0's
        // edge 1 (1->2) and face 1's edge 3 (2->1).
        let (b, inv, _) = grid.try_move(a, 1).unwrap().unwrap();
        assert_eq!(b, Cell::new2(1, 0));
        let (back, _, _) = grid.try_move(b, inv).unwrap().unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn boundary_edge_has_no_neighbour() {
        let grid = MeshGrid::new(two_quads());
        assert!(grid.try_move(Cell::new2(0, 0), 0).unwrap().is_none());
    }

    #[test]
    fn find_cell_locates_containing_face() {
        let grid = MeshGrid::new(two_quads());
        assert_eq!(grid.find_cell(V3::new(0.5, 0.5, 0.0)), Some(Cell::new2(0, 0)));
        assert_eq!(grid.find_cell(V3::new(1.5, 0.5, 0.0)), Some(Cell::new2(1, 0)));
        assert_eq!(grid.find_cell(V3::new(5.0, 5.0, 0.0)), None);
    }
}
