//! # Puzzle Press Renderer
//!
//! Turns puzzle payloads into laid-out pages: adaptive sizing, grid drawing,
//! column/page flow and font provisioning, composed per puzzle type into a
//! multi-page PDF or a sequence of PNG images.
//!
//! ## Pipeline
//!
//! ```text
//! payload ──► ensure_fonts_ready ──► compose ──► Artifact
//!                  (await)            │
//!                                     ├─ sizing   (radii, cell sizes)
//!                                     ├─ grid     (lines, fills, glyphs)
//!                                     └─ flow     (columns, pages, headers)
//!                                          │
//!                                          ▼
//!                                   Surface (PDF | SVG→PNG | recording)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod compose;
pub mod error;
pub mod export;
pub mod fonts;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod pagination;
pub mod sizing;

pub use backend::{Surface, TextAlign, TextStyle};
pub use compose::{compose, ComposeContext, Numbering, Section};
pub use error::{RenderError, RenderResult};
pub use export::{sanitize_file_base, Artifact, ImageBatch, RasterPage};
pub use fonts::{FontProvisioner, FontRegistry, FontsReady};
pub use layout::{LayoutConfig, PageSize};
pub use usvg::fontdb;

use puzzle_core::{PuzzlePayload, StyleParameters};

/// Composes payloads once the fonts they name are ready.
pub struct PuzzleComposer {
    provisioner: FontProvisioner,
    layout: LayoutConfig,
}

impl PuzzleComposer {
    /// Create a composer.
    #[must_use]
    pub fn new(provisioner: FontProvisioner, layout: LayoutConfig) -> Self {
        Self {
            provisioner,
            layout,
        }
    }

    /// Layout in use.
    #[must_use]
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Font provisioner in use.
    #[must_use]
    pub fn provisioner(&self) -> &FontProvisioner {
        &self.provisioner
    }

    /// Provision the style's font, then compose the payload.
    ///
    /// Returns `Ok(None)` when the payload has nothing to render. Drawing
    /// starts only after provisioning has settled.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or serialization fails. Font failures
    /// are logged and fall back.
    pub async fn compose(
        &self,
        payload: &PuzzlePayload,
        style: &StyleParameters,
    ) -> RenderResult<Option<Artifact>> {
        if !payload.can_generate() {
            tracing::debug!("Nothing to render for {}", payload.kind());
            return Ok(None);
        }
        let fonts = self
            .provisioner
            .ensure_fonts_ready([style.font_family.as_str()])
            .await;
        let ctx = ComposeContext::new(style, &fonts, &self.layout);
        compose::compose(payload, &ctx)
    }
}

/// Renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
