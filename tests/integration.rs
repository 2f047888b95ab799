//! End-to-end scenarios exercising the public API surface across modules (each
//! colocated unit test module covers the same ground in isolation; these confirm
//! the pieces compose as a caller would actually use them).

use pretty_assertions::assert_eq;
use sylves::bound::Bound;
use sylves::cell::{Cell, CellRotation};
use sylves::cell_type::CellType;
use sylves::grid::{Grid, SquareGrid};
use sylves::pathfinding::{always_accessible, bfs, unit_step_length};

#[test]
fn square_grid_bound_and_unbound_round_trip() {
    let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((0, 0), (2, 1)));
    assert_eq!(grid.get_cell_count(), Some(6));
    assert!(grid.is_cell_in_grid(Cell::new(0, 0, 0)));
    assert!(!grid.is_cell_in_grid(Cell::new(3, 0, 0)));

    let unbounded = grid.unbounded();
    assert!(unbounded.is_cell_in_grid(Cell::new(3, 0, 0)));
    assert_eq!(unbounded.get_cell_count(), None);
}

#[test]
fn square_cell_type_group_laws() {
    let ct = CellType::Square;
    assert_eq!(ct.dir_count(), 4);
    assert_eq!(ct.corner_count(), 4);
    assert_eq!(ct.dimension(), 2);
    assert_eq!(ct.rotate_dir(0, CellRotation(1)).unwrap(), 1);
    assert_eq!(ct.invert_dir(0).unwrap(), 2);
    assert_eq!(ct.multiply_rotations(CellRotation(1), CellRotation(1)), CellRotation(2));
    assert_eq!(ct.multiply_rotations(CellRotation(3), CellRotation(1)), CellRotation(0));
    assert_eq!(ct.invert_rotation(CellRotation(1)), CellRotation(3));

    for corner in ct.enumerate_corners() {
        let p = ct.corner_position(corner);
        assert_eq!(p.x.abs(), 0.5);
        assert_eq!(p.y.abs(), 0.5);
        assert_eq!(p.z, 0.0);
    }
}

#[test]
fn bfs_distance_seven_on_an_open_square_grid() {
    let grid = Grid::new(SquareGrid::new(1.0)).bound_by(Bound::rect((-10, -10), (10, 10)));
    let source = Cell::new2(0, 0);
    let target = Cell::new2(3, 4);
    let result = bfs(&grid, source, None, None, &always_accessible, &unit_step_length).unwrap();
    assert_eq!(result.distance(target), Some(7));
    let path = result.path_to(target).unwrap();
    assert_eq!(path.steps.len(), 7);
    assert_eq!(path.steps.last().unwrap().dest, target);
}

#[cfg(feature = "serde")]
#[test]
fn cell_survives_a_json_round_trip() {
    let cell = Cell::new(2, -3, 5);
    let json = serde_json::to_string(&cell).unwrap();
    let back: Cell = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cell);
}
