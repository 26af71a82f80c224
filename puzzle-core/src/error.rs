//! Error types for puzzle data operations.

use thiserror::Error;

/// Result type for puzzle data operations.
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Errors that can occur while building or editing puzzle data.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// A grid row has a different length from the first row.
    #[error("Ragged grid: row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        /// Index of the offending row.
        row: usize,
        /// Expected row length (length of row 0).
        expected: usize,
        /// Actual row length.
        found: usize,
    },

    /// A word placement references a cell outside the grid.
    #[error("Placement for '{word}' leaves the grid at ({row}, {col})")]
    PlacementOutOfBounds {
        /// The placed word.
        word: String,
        /// Row of the offending coordinate.
        row: usize,
        /// Column of the offending coordinate.
        col: usize,
    },

    /// Marker not found on the board.
    #[error("Marker not found: {0}")]
    MarkerNotFound(String),

    /// Invalid marker operation.
    #[error("Invalid marker operation: {0}")]
    InvalidMarker(String),

    /// A name did not match any known value.
    #[error("Unknown {what}: '{value}'")]
    UnknownValue {
        /// What was being parsed.
        what: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Payload serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
