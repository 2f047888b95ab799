//! The error taxonomy observable to callers (spec §6).
//!
//! Core operations return either a success value or one of these; there are no
//! exceptions, and panics are reserved for broken invariants detected mid-operation
//! (e.g. mesh half-edge inconsistency), per spec §7.

use thiserror::Error;

/// Every error kind `sylves` operations may report.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum SylvesError {
    #[error("null pointer")]
    NullPointer,
    #[error("index out of bounds")]
    OutOfBounds,
    #[error("out of memory")]
    OutOfMemory,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("not implemented")]
    NotImplemented,
    #[error("cell is not in grid")]
    CellNotInGrid,
    #[error("operation not supported for this grid/bound variant")]
    NotSupported,
    #[error("no path found")]
    PathNotFound,
    #[error("math error")]
    Math,
    #[error("destination buffer too small")]
    BufferTooSmall,
    #[error("grid is infinite")]
    InfiniteGrid,
    #[error("invalid internal state")]
    InvalidState,
    #[error("grid is unbounded")]
    Unbounded,
    #[error("invalid cell")]
    InvalidCell,
    #[error("invalid direction")]
    InvalidDir,
    #[error("no neighbor in that direction")]
    NoNeighbor,
    #[error("invalid corner")]
    InvalidCorner,
    #[error("cell not found")]
    CellNotFound,
    #[error("I/O error")]
    Io,
    #[error("not found")]
    NotFound,
}

/// Shorthand used throughout the crate.
pub type SylvesResult<T> = Result<T, SylvesError>;
