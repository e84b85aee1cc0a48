//! Error types for loading and validating maze boards.

use std::path::PathBuf;

/// Everything that can go wrong before a search starts.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("failed to read board file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("board has no start cell 'S'")]
    NoStart,

    #[error("board has {0} start cells, expected exactly one")]
    MultipleStarts(usize),

    #[error("board has no goal cell 'G'")]
    NoGoal,

    #[error("board has {0} goal cells, expected exactly one")]
    MultipleGoals(usize),

    #[error("unknown token {token:?} at row {row}, column {col}")]
    UnknownToken { token: String, row: usize, col: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board is empty")]
    Empty,

    /// The three faces do not describe a physical die
    #[error("no die orientation has top {top}, north {north} and east {east}")]
    InvalidDie { top: u8, north: u8, east: u8 },
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
