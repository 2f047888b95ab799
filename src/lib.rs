//! `sylves` is a library for creating, manipulating, and pathfinding over 2D and 3D
//! discrete spatial grids: square, hex, triangle, and cube lattices, arbitrary mesh
//! grids, Voronoi grids built from point sets, and a family of grid modifiers
//! (bijection, mask, nesting, rebounding) that compose over any of the above.
//!
//! The central abstraction is [`grid::Grid`], a uniform handle over every grid kind;
//! most code works against it rather than a concrete grid type.

pub mod alloc;
pub mod bound;
pub mod cache;
pub mod cell;
pub mod cell_type;
pub mod error;
pub mod export;
pub mod grid;
pub mod math;
pub mod mesh;
pub mod pathfinding;

pub use bound::Bound;
pub use cell::{Cell, CellDir, CellPath, CellRotation, Connection, RotationOrReflection, Step};
pub use cell_type::CellType;
pub use error::{SylvesError, SylvesResult};
pub use grid::{CubeGrid, Grid, GridKind, GridTrait, HexGrid, HexOrientation, MeshGrid, SquareGrid, TriangleGrid, TriangleOrientation, VoronoiGrid};
pub use mesh::{MeshData, MeshTopology};
