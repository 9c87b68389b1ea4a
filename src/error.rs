//! Error types for map loading and environment construction.

use crate::grid::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Structural problems found while building an [`Environment`](crate::environment::Environment).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("grid has no rows")]
    EmptyGrid,

    #[error("grid must be rectangular: row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) has cost {value}; only -1 may mark a blocked cell")]
    InvalidCost { row: usize, col: usize, value: i64 },

    #[error("{what} position {pos} lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        what: &'static str,
        pos: Position,
        rows: usize,
        cols: usize,
    },

    #[error("moving obstacle has an empty identifier")]
    EmptyObstacleId,

    #[error("moving obstacle '{0}' is defined more than once")]
    DuplicateObstacle(String),

    #[error("waypoint {index} of moving obstacle '{id}' at {pos} lies outside the grid")]
    WaypointOutOfBounds {
        id: String,
        index: usize,
        pos: Position,
    },
}

/// Fatal errors raised while reading a map source.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("map file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing {} line {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid environment in {}: {source}", path.display())]
    Environment {
        path: PathBuf,
        #[source]
        source: EnvironmentError,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;
