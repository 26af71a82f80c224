//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during composition and export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No drawing surface (or no open page) to draw on.
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// A font could not be loaded or registered.
    #[error("Font provisioning failed for '{name}': {reason}")]
    Font {
        /// Requested font name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// Serializing the finished artifact failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
