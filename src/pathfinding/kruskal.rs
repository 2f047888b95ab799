//! Kruskal's minimum spanning tree over an explicit cell set via union-find
//! (spec §4.8).

use crate::bound::CellHashMap;
use crate::cell::{Cell, Step};
use crate::error::SylvesResult;
use crate::grid::Grid;

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect(), rank: vec![0; n] }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// A spanning-tree edge between two of the input cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MstEdge {
    pub src: Cell,
    pub dest: Cell,
    pub length: f32,
}

/// Kruskal's MST over `cells` (spec §4.8): edges come from `try_move` between
/// cells both present in `cells`, deduplicated by requiring `src_index < dest_index`
/// (the index being each cell's position in `cells`).
pub fn kruskal_mst(
    grid: &Grid,
    cells: &[Cell],
    step_length: &(dyn Fn(Step) -> f32 + Sync),
) -> SylvesResult<Vec<MstEdge>> {
    let index_of: CellHashMap<usize> = cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut edges: Vec<(f32, usize, usize)> = Vec::new();
    for (src_index, &cell) in cells.iter().enumerate() {
        for dir in grid.get_cell_dirs(cell)? {
            let Some((dest, inverse_dir, connection)) = grid.try_move(cell, dir)? else {
                continue;
            };
            let Some(&dest_index) = index_of.get(&dest) else {
                continue;
            };
            if src_index >= dest_index {
                continue;
            }
            let step = Step {
                src: cell,
                dest,
                dir,
                inverse_dir,
                connection,
                length: 1.0,
            };
            let length = step_length(step);
            if length < 0.0 {
                continue;
            }
            edges.push((length, src_index, dest_index));
        }
    }
    edges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut uf = UnionFind::new(cells.len());
    let mut mst = Vec::new();
    for (length, a, b) in edges {
        if uf.union(a, b) {
            mst.push(MstEdge { src: cells[a], dest: cells[b], length });
        }
    }
    Ok(mst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::Bound;
    use crate::grid::SquareGrid;

    #[test]
    fn spans_a_small_grid_with_n_minus_1_edges() {
        let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((0, 0), (2, 2)));
        let cells = grid.get_cells().unwrap();
        let mst = kruskal_mst(&grid, &cells, &super::super::unit_step_length).unwrap();
        assert_eq!(mst.len(), cells.len() - 1);
    }
}
