//! Error taxonomy for the simulation core.
//!
//! Every variant is a contract violation or a runaway condition. Expected
//! negative outcomes (a blocked spawn, a rejected rotation) are plain
//! `bool`/`Option` results and never show up here.

use crate::types::Player;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("pattern has no rows")]
    EmptyPattern,

    #[error("malformed pattern: row {row} has width {found}, expected {expected}")]
    MalformedPattern {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) is outside a {height}x{width} pattern")]
    OutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("cannot impose onto an already set cell at offset {offset}")]
    OverlapViolation { offset: usize },

    #[error("player {0} already holds a shape")]
    DuplicateSpawn(Player),

    #[error("player {0} shape must be moving")]
    StationaryPlayerShape(Player),

    #[error("shape at ({horizontal}, {vertical}) does not fit the scene")]
    ShapeOutOfBounds { horizontal: i32, vertical: i32 },

    #[error("grid inconsistency at column {col}, row {row}: {detail}")]
    GridInconsistency {
        col: usize,
        row: usize,
        detail: String,
    },

    #[error("invalid scene dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("stuck resolving rubble after {iterations} sweeps:\n{snapshot}")]
    StuckResolution { iterations: usize, snapshot: String },

    #[error("snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("invalid config: {0}")]
    Config(String),
}

/// Parse failures of the textual grid snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is empty")]
    Empty,

    #[error("line {line} has {found} cells, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognised token {token:?} at line {line}, cell {cell}")]
    BadToken {
        line: usize,
        cell: usize,
        token: String,
    },

    #[error("wall offset {wall} at line {line}, cell {cell} is outside the scene")]
    BadWall { line: usize, cell: usize, wall: usize },
}
