//! Error types for the workbench.

use puzzle_core::PuzzleError;
use puzzle_renderer::RenderError;
use thiserror::Error;

/// Result type for workbench operations.
pub type PressResult<T> = Result<T, PressError>;

/// Errors that can occur while fetching, composing or emitting puzzles.
#[derive(Debug, Error)]
pub enum PressError {
    /// Another generation holds the loading gate.
    #[error("A generation is already in progress")]
    Busy,

    /// The configuration cannot produce a working setup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation service URL is malformed.
    #[error("Invalid generation service URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("Generation service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation service answered with a non-success status.
    #[error("Generation service returned HTTP {0}")]
    Status(u16),

    /// Puzzle data could not be read.
    #[error("Puzzle data unreadable: {0}")]
    Payload(#[from] PuzzleError),

    /// Composition or export failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A blocking rasterization task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document viewer could not be launched.
    #[error("Viewer '{command}' failed: {reason}")]
    Viewer {
        /// Configured viewer command.
        command: String,
        /// What went wrong.
        reason: String,
    },
}
