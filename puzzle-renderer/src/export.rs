//! Finished artifacts and their file names.
//!
//! A document artifact is complete PDF bytes. An image artifact keeps each
//! page as SVG and rasterizes on demand, so only one pixmap exists at a time
//! while pages are saved one after another.

use std::sync::Arc;

use puzzle_core::{PuzzleKind, StyleParameters};
use usvg::fontdb;

use crate::backend::svg::render_png;
use crate::compose::Section;
use crate::error::RenderResult;

/// One raster page awaiting rasterization.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// Puzzle or solution.
    pub section: Section,
    /// 1-based puzzle index.
    pub index: usize,
    /// 1-based page within the section (continuations are 2, 3, …).
    pub part: usize,
    /// SVG document of the page.
    pub svg: String,
}

impl RasterPage {
    /// `{base}_{puzzle|solution}_{index}.png`, with `_{part}` appended for
    /// continuation pages.
    #[must_use]
    pub fn filename(&self, base: &str) -> String {
        if self.part > 1 {
            format!(
                "{base}_{}_{}_{}.png",
                self.section.slug(),
                self.index,
                self.part
            )
        } else {
            format!("{base}_{}_{}.png", self.section.slug(), self.index)
        }
    }
}

/// Ordered raster pages sharing one font database.
#[derive(Debug, Clone)]
pub struct ImageBatch {
    base: String,
    pages: Vec<RasterPage>,
    database: Arc<fontdb::Database>,
    scale: f32,
}

impl ImageBatch {
    /// Bundle pages for emission.
    #[must_use]
    pub fn new(
        base: String,
        pages: Vec<RasterPage>,
        database: Arc<fontdb::Database>,
        scale: f32,
    ) -> Self {
        Self {
            base,
            pages,
            database,
            scale,
        }
    }

    /// Sanitized base file name.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Pages in emission order.
    #[must_use]
    pub fn pages(&self) -> &[RasterPage] {
        &self.pages
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether there are no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// File name of a page.
    #[must_use]
    pub fn filename(&self, page: &RasterPage) -> String {
        page.filename(&self.base)
    }

    /// Rasterize one page to PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or encoding fails.
    pub fn render(&self, page: &RasterPage) -> RenderResult<Vec<u8>> {
        tracing::trace!("Rasterizing {}", self.filename(page));
        render_png(&page.svg, Arc::clone(&self.database), self.scale)
    }
}

/// The composed output of one generation.
#[derive(Debug, Clone)]
pub enum Artifact {
    /// One multi-page PDF, opened in a viewer.
    Document {
        /// Document title, also its file stem.
        title: String,
        /// PDF bytes.
        bytes: Vec<u8>,
    },
    /// Independent images, each saved as a file.
    Images(ImageBatch),
}

impl Artifact {
    /// Number of output units: one document, or one per image.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        match self {
            Self::Document { .. } => 1,
            Self::Images(batch) => batch.len(),
        }
    }
}

/// Reduce a name to a safe file stem.
///
/// ASCII letters, digits, `-` and `_` are kept; anything else becomes `_`,
/// runs of `_` collapse and leading/trailing `_` are trimmed. An empty
/// result falls back to `default`.
#[must_use]
pub fn sanitize_file_base(name: &str, default: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// File stem for a kind of output: the sanitized custom name when naming is
/// custom, otherwise the kind's default.
#[must_use]
pub fn file_base(style: &StyleParameters, kind: PuzzleKind) -> String {
    style
        .custom_file_base()
        .map_or_else(|| kind.slug().to_string(), |name| sanitize_file_base(name, kind.slug()))
}
