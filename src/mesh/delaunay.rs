//! Robust 2D Delaunay triangulation (spec §4.5).
//!
//! Implemented as a classic Bowyer-Watson incremental triangulation (the "Delaunay"
//! row of spec §2's layer table names both "Bowyer-Watson" and "incremental
//! triangulation" as acceptable names for this component): a super-triangle seeds
//! the mesh, each point's containing-circumcircle "cavity" of bad triangles is
//! removed and re-triangulated, and the super-triangle's vertices are stripped at
//! the end. Determinism comes from the same two numeric predicates the sweep-hull
//! variant in the reference uses: [`orient2d`] and [`incircle`].

use std::collections::HashMap;

use crate::math::EPSILON;

/// A 2D point used only by the triangulator (inputs are projected to `(x, y)`).
pub type Point2 = (f64, f64);

/// Sign of the signed area of the triangle `p, q, r` (spec §4.5). Positive means
/// `r` is to the left of the directed line `p -> q` (i.e. `p, q, r` is CCW).
pub fn orient2d(p: Point2, q: Point2, r: Point2) -> f64 {
    (q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)
}

fn circumcircle(a: Point2, b: Point2, c: Point2) -> Option<(Point2, f64)> {
    let ax = a.0;
    let ay = a.1;
    let bx = b.0 - ax;
    let by = b.1 - ay;
    let cx = c.0 - ax;
    let cy = c.1 - ay;
    let d = 2.0 * (bx * cy - by * cx);
    if d.abs() < f64::EPSILON {
        return None;
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    let center = (ax + ux, ay + uy);
    let r2 = ux * ux + uy * uy;
    Some((center, r2))
}

/// True iff `p` lies strictly inside the CCW circumcircle of `a, b, c` (spec §4.5).
pub fn incircle(a: Point2, b: Point2, c: Point2, p: Point2) -> bool {
    match circumcircle(a, b, c) {
        Some((center, r2)) => {
            let dx = p.0 - center.0;
            let dy = p.1 - center.1;
            dx * dx + dy * dy < r2 - f64::EPSILON.max(r2 * 1e-12)
        }
        None => false,
    }
}

/// The flattened output of [`delaunay_triangulate`] (spec §4.5's "Outputs").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DelaunayResult {
    /// `3T` indices into the input point slice, one triple per triangle, CCW.
    pub triangles: Vec<i32>,
    /// Parallel to `triangles`: the index (into `triangles`/`halfedges`) of the
    /// opposing half-edge, or `-1` on the hull.
    pub halfedges: Vec<i32>,
    /// Convex hull vertex indices, CCW.
    pub hull: Vec<i32>,
}

fn dedup_points(points: &[Point2]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .0
            .partial_cmp(&points[b].0)
            .unwrap()
            .then(points[a].1.partial_cmp(&points[b].1).unwrap())
    });
    let mut kept = Vec::new();
    for &i in &order {
        let is_dup = kept.last().is_some_and(|&last: &usize| {
            let (dx, dy) = (points[i].0 - points[last].0, points[i].1 - points[last].1);
            dx * dx + dy * dy < EPSILON * EPSILON
        });
        if !is_dup {
            kept.push(i);
        }
    }
    kept
}

fn is_collinear(points: &[Point2], indices: &[usize]) -> bool {
    if indices.len() < 3 {
        return true;
    }
    let (p0, p1) = (points[indices[0]], points[indices[1]]);
    indices[2..]
        .iter()
        .all(|&i| orient2d(p0, p1, points[i]).abs() < 1e-9)
}

/// Triangulates a set of 2D points (spec §4.5).
pub fn delaunay_triangulate(points: &[Point2]) -> DelaunayResult {
    let unique = dedup_points(points);

    if unique.len() < 3 || is_collinear(points, &unique) {
        let mut hull = unique.clone();
        hull.sort_by(|&a, &b| {
            points[a]
                .0
                .partial_cmp(&points[b].0)
                .unwrap()
                .then(points[a].1.partial_cmp(&points[b].1).unwrap())
        });
        return DelaunayResult {
            triangles: Vec::new(),
            halfedges: Vec::new(),
            hull: hull.into_iter().map(|i| i as i32).collect(),
        };
    }

    // Super-triangle enclosing every point with generous margin.
    let (mut minx, mut miny, mut maxx, mut maxy) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for &i in &unique {
        let (x, y) = points[i];
        minx = minx.min(x);
        miny = miny.min(y);
        maxx = maxx.max(x);
        maxy = maxy.max(y);
    }
    let dx = (maxx - minx).max(1.0);
    let dy = (maxy - miny).max(1.0);
    let mid_x = (minx + maxx) / 2.0;
    let mid_y = (miny + maxy) / 2.0;
    let span = (dx.max(dy)) * 20.0;
    let n = points.len();
    let super_a = n;
    let super_b = n + 1;
    let super_c = n + 2;
    let mut all_points: Vec<Point2> = points.to_vec();
    all_points.push((mid_x - span, mid_y - span));
    all_points.push((mid_x + span, mid_y - span));
    all_points.push((mid_x, mid_y + span));

    // Triangles stored as CCW vertex triples.
    let mut tris: Vec<[usize; 3]> = vec![[super_a, super_b, super_c]];

    for &p in &unique {
        let point = all_points[p];
        let mut bad: Vec<usize> = Vec::new();
        for (ti, tri) in tris.iter().enumerate() {
            let (a, b, c) = (all_points[tri[0]], all_points[tri[1]], all_points[tri[2]]);
            if incircle(a, b, c, point) {
                bad.push(ti);
            }
        }

        // Boundary of the cavity: edges that belong to exactly one bad triangle.
        let mut edge_count: HashMap<(usize, usize), u32> = HashMap::new();
        for &ti in &bad {
            let tri = tris[ti];
            for k in 0..3 {
                let (u, v) = (tri[k], tri[(k + 1) % 3]);
                let key = (u.min(v), u.max(v));
                *edge_count.entry(key).or_insert(0) += 1;
            }
        }
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &ti in &bad {
            let tri = tris[ti];
            for k in 0..3 {
                let (u, v) = (tri[k], tri[(k + 1) % 3]);
                let key = (u.min(v), u.max(v));
                if edge_count[&key] == 1 {
                    boundary.push((u, v));
                }
            }
        }

        let mut bad_sorted = bad;
        bad_sorted.sort_unstable_by(|a, b| b.cmp(a));
        for ti in bad_sorted {
            tris.swap_remove(ti);
        }

        for (u, v) in boundary {
            tris.push([u, v, p]);
        }
    }

    // Drop any triangle touching a super-triangle vertex.
    let super_verts = [super_a, super_b, super_c];
    tris.retain(|tri| !tri.iter().any(|v| super_verts.contains(v)));

    // Degenerate (zero-area) triangles can arise from near-collinear point sets;
    // drop them rather than emitting a non-finite-circumradius "triangle".
    tris.retain(|tri| {
        let (a, b, c) = (all_points[tri[0]], all_points[tri[1]], all_points[tri[2]]);
        orient2d(a, b, c).abs() > 1e-12
    });

    let triangles: Vec<i32> = tris.iter().flat_map(|t| t.iter().map(|&v| v as i32)).collect();

    // Match shared undirected edges to build the halfedges array.
    let t = tris.len();
    let mut halfedges = vec![-1i32; t * 3];
    let mut edge_owner: HashMap<(usize, usize), usize> = HashMap::new();
    for (ti, tri) in tris.iter().enumerate() {
        for k in 0..3 {
            let (u, v) = (tri[k], tri[(k + 1) % 3]);
            let he = ti * 3 + k;
            let key = (u.min(v), u.max(v));
            if let Some(&other) = edge_owner.get(&key) {
                halfedges[he] = other as i32;
                halfedges[other] = he as i32;
            } else {
                edge_owner.insert(key, he);
            }
        }
    }

    // The hull is the set of directed edges with no partner, chained by successor.
    let mut next_from: HashMap<usize, usize> = HashMap::new();
    for (ti, tri) in tris.iter().enumerate() {
        for k in 0..3 {
            let he = ti * 3 + k;
            if halfedges[he] == -1 {
                let (u, v) = (tri[k], tri[(k + 1) % 3]);
                next_from.insert(u, v);
            }
        }
    }
    let mut hull = Vec::new();
    if let Some(&start) = next_from.keys().next() {
        let mut cur = start;
        loop {
            hull.push(cur as i32);
            cur = match next_from.get(&cur) {
                Some(&n) => n,
                None => break,
            };
            if cur == start || hull.len() > next_from.len() {
                break;
            }
        }
    }

    DelaunayResult {
        triangles,
        halfedges,
        hull,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_cocircular_points_give_two_triangles() {
        let points = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let result = delaunay_triangulate(&points);
        assert_eq!(result.triangles.len(), 6); // 2 triangles
        let hull_boundary_count = result.halfedges.iter().filter(|&&h| h == -1).count();
        assert_eq!(hull_boundary_count, 4);
        assert_eq!(result.hull.len(), 4);
    }

    #[test]
    fn collinear_points_yield_no_triangles() {
        let points = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
        let result = delaunay_triangulate(&points);
        assert!(result.triangles.is_empty());
        assert_eq!(result.hull.len(), 4);
    }

    #[test]
    fn empty_circle_property_holds() {
        let points = [
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 2.0),
            (1.0, 0.5),
            (0.4, 1.1),
            (1.6, 1.1),
        ];
        let result = delaunay_triangulate(&points);
        for tri in result.triangles.chunks(3) {
            let (a, b, c) = (
                points[tri[0] as usize],
                points[tri[1] as usize],
                points[tri[2] as usize],
            );
            for (i, &p) in points.iter().enumerate() {
                if i as i32 == tri[0] || i as i32 == tri[1] || i as i32 == tri[2] {
                    continue;
                }
                assert!(!incircle(a, b, c, p), "point {i} inside circumcircle of {tri:?}");
            }
        }
    }
}
