//! Point-seeded Voronoi grids (spec §4.7): Delaunay -> dual -> mesh grid.

use std::any::Any;

use crate::bound::Bound;
use crate::cell::{Cell, CellDir, Connection};
use crate::cell_type::CellType;
use crate::error::{SylvesError, SylvesResult};
use crate::math::{Aabb, Float, V3};
use crate::mesh::{build_dual_mesh, delaunay_triangulate, MeshData, MeshTopology, Point2};

use super::mesh_grid::MeshGrid;
use super::GridTrait;

/// Builds the Voronoi diagram's dual mesh of a point set, optionally clipped to an
/// AABB and optionally relaxed (spec §4.7).
fn voronoi_mesh(points: &[Point2], relax_iterations: u32, clip: Option<(Point2, Point2)>) -> SylvesResult<MeshData> {
    let mut pts = points.to_vec();
    for _ in 0..relax_iterations {
        pts = lloyd_step(&pts, clip);
    }

    let result = delaunay_triangulate(&pts);
    if result.triangles.is_empty() {
        return Err(SylvesError::NotSupported);
    }

    let vertices: Vec<V3> = pts.iter().map(|&(x, y)| V3::new(x, y, 0.0)).collect();
    let mut flat = Vec::new();
    for tri in result.triangles.chunks(3) {
        flat.push(tri[0]);
        flat.push(tri[1]);
        flat.push(!tri[2]);
    }
    let mut primal = MeshData::new(vertices);
    primal.set_submesh(0, &flat, MeshTopology::Triangles)?;

    let dual = build_dual_mesh(&mut primal, crate::math::DEFAULT_FAR_VERTEX_THRESHOLD)?;
    let mut mesh = dual.mesh;

    if let Some((min, max)) = clip {
        clip_mesh_vertices(&mut mesh, min, max);
    }

    Ok(mesh)
}

/// One Lloyd-relaxation iteration: move each point to the centroid of its Voronoi
/// cell, pinning points on the clip boundary in place when a clip box is given
/// (spec §4.7: "border points pinned when a clip box is provided").
fn lloyd_step(points: &[Point2], clip: Option<(Point2, Point2)>) -> Vec<Point2> {
    let result = delaunay_triangulate(points);
    if result.triangles.is_empty() {
        return points.to_vec();
    }
    let mut primal = MeshData::new(points.iter().map(|&(x, y)| V3::new(x, y, 0.0)).collect());
    let mut flat = Vec::new();
    for tri in result.triangles.chunks(3) {
        flat.push(tri[0]);
        flat.push(tri[1]);
        flat.push(!tri[2]);
    }
    if primal.set_submesh(0, &flat, MeshTopology::Triangles).is_err() {
        return points.to_vec();
    }
    let dual = match build_dual_mesh(&mut primal, crate::math::DEFAULT_FAR_VERTEX_THRESHOLD) {
        Ok(d) => d,
        Err(_) => return points.to_vec(),
    };

    let dual_faces: Vec<Vec<u32>> = dual.mesh.faces().map(|(_, _, f)| f).collect();

    let mut new_points = points.to_vec();
    for (i, &(x, y)) in points.iter().enumerate() {
        if let Some((min, max)) = clip {
            let on_border = x <= min.0 || x >= max.0 || y <= min.1 || y >= max.1;
            if on_border {
                continue;
            }
        }
        let dual_face_index = dual.mappings.iter().find(|m| m.primal_vertex == i).map(|m| m.dual_face);
        let Some(f) = dual_face_index.and_then(|idx| dual_faces.get(idx)) else {
            continue;
        };
        let centroid = f.iter().fold((0.0, 0.0), |(ax, ay), &v| {
            let p = dual.mesh.vertices()[v as usize];
            (ax + p.x, ay + p.y)
        });
        let n = f.len().max(1) as f64;
        new_points[i] = (centroid.0 / n, centroid.1 / n);
    }
    new_points
}

fn clip_mesh_vertices(mesh: &mut MeshData, min: Point2, max: Point2) {
    for v in mesh.vertices_mut() {
        v.x = v.x.clamp(min.0, max.0);
        v.y = v.y.clamp(min.1, max.1);
    }
}

/// A Voronoi diagram of a fixed point set, exposed through the [`super::Grid`]
/// protocol by building its dual mesh once and delegating to a [`MeshGrid`]
/// (spec §4.7: "feed the resulting mesh into the mesh grid constructor").
#[derive(Clone, Debug)]
pub struct VoronoiGrid {
    inner: MeshGrid,
}

impl VoronoiGrid {
    pub fn new(points: &[Point2]) -> SylvesResult<Self> {
        let mesh = voronoi_mesh(points, 0, None)?;
        Ok(Self { inner: MeshGrid::new(mesh) })
    }

    pub fn with_clip(points: &[Point2], min: Point2, max: Point2) -> SylvesResult<Self> {
        let mesh = voronoi_mesh(points, 0, Some((min, max)))?;
        Ok(Self { inner: MeshGrid::new(mesh) })
    }

    pub fn relaxed(points: &[Point2], iterations: u32, clip: Option<(Point2, Point2)>) -> SylvesResult<Self> {
        let mesh = voronoi_mesh(points, iterations, clip)?;
        Ok(Self { inner: MeshGrid::new(mesh) })
    }
}

impl GridTrait for VoronoiGrid {
    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.inner.is_cell_in_grid(cell)
    }

    fn get_cell_type(&self, cell: Cell) -> SylvesResult<CellType> {
        self.inner.get_cell_type(cell)
    }

    fn try_move(&self, cell: Cell, dir: CellDir) -> SylvesResult<Option<(Cell, CellDir, Connection)>> {
        self.inner.try_move(cell, dir)
    }

    fn get_cell_dirs(&self, cell: Cell) -> SylvesResult<Vec<CellDir>> {
        self.inner.get_cell_dirs(cell)
    }

    fn get_cell_center(&self, cell: Cell) -> V3 {
        self.inner.get_cell_center(cell)
    }

    fn get_cell_corners(&self, cell: Cell) -> Vec<V3> {
        self.inner.get_cell_corners(cell)
    }

    fn find_cell(&self, position: V3) -> Option<Cell> {
        self.inner.find_cell(position)
    }

    fn get_cell_aabb(&self, cell: Cell) -> Aabb {
        self.inner.get_cell_aabb(cell)
    }

    fn is_finite(&self) -> bool {
        self.inner.is_finite()
    }

    fn is_2d(&self) -> bool {
        self.inner.is_2d()
    }

    fn get_cell_count(&self) -> Option<i64> {
        self.inner.get_cell_count()
    }

    fn get_cells(&self) -> SylvesResult<Vec<Cell>> {
        self.inner.get_cells()
    }

    fn bound(&self) -> Option<&Bound> {
        self.inner.bound()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_point_voronoi_builds_a_mesh_grid() {
        let points = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (1.0, 1.0)];
        let grid = VoronoiGrid::new(&points).unwrap();
        assert!(grid.get_cell_count().unwrap() > 0);
    }

    #[test]
    fn clipped_vertices_stay_within_bounds() {
        let points = [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0), (1.5, 1.5)];
        let grid = VoronoiGrid::with_clip(&points, (0.0, 0.0), (3.0, 3.0)).unwrap();
        for cell in grid.get_cells().unwrap() {
            for corner in grid.get_cell_corners(cell) {
                assert!(corner.x >= -1e-9 && corner.x <= 3.0 + 1e-9);
                assert!(corner.y >= -1e-9 && corner.y <= 3.0 + 1e-9);
            }
        }
    }
}
