//! Per-type page composition.
//!
//! Raster types (word search, nurikabe) render each section onto its own
//! [`SvgSurface`]; every page of that surface becomes one image, ordered
//! puzzle 1, solution 1, puzzle 2, solution 2, and so on. Document types
//! render every section into one [`PdfSurface`]: all puzzle sections first,
//! then all solution sections.
//!
//! Every section starts on a fresh page with its title, and the title is
//! redrawn on each page the pagination controller adds.

pub mod cryptogram;
pub mod dot_to_dot;
pub mod hangman;
pub mod nurikabe;
pub mod scramble;
pub mod word_search;

mod letters;

use puzzle_core::{PuzzleKind, PuzzlePayload, StyleParameters};

use crate::backend::pdf::PdfSurface;
use crate::backend::svg::SvgSurface;
use crate::backend::{Surface, TextAlign, TextStyle};
use crate::error::RenderResult;
use crate::export::{file_base, Artifact, ImageBatch, RasterPage};
use crate::fonts::FontsReady;
use crate::geometry::Point;
use crate::layout::{LayoutConfig, PageFrame};
use crate::metrics;

/// Everything a composer reads while drawing.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    /// Caller's style choices.
    pub style: &'a StyleParameters,
    /// Provisioned fonts.
    pub fonts: &'a FontsReady,
    /// Layout tunables.
    pub layout: &'a LayoutConfig,
}

impl<'a> ComposeContext<'a> {
    /// Bundle the composition inputs.
    #[must_use]
    pub fn new(style: &'a StyleParameters, fonts: &'a FontsReady, layout: &'a LayoutConfig) -> Self {
        Self {
            style,
            fonts,
            layout,
        }
    }

    /// Body text in the chosen font.
    #[must_use]
    pub fn body(&self, frame: &PageFrame) -> TextStyle {
        TextStyle::new(self.style.font_family.as_str(), frame.body_size)
    }

    /// Break `text` into body-size lines no wider than the content area.
    #[must_use]
    pub fn wrap_body(&self, text: &str, frame: &PageFrame) -> Vec<String> {
        let class = self.fonts.resolve(&self.style.font_family).metric_class();
        metrics::wrap(text, frame.content.width, frame.body_size, class)
    }

    /// Section title text in the chosen font.
    #[must_use]
    pub fn title(&self, frame: &PageFrame) -> TextStyle {
        TextStyle::new(self.style.font_family.as_str(), frame.title_size).aligned(TextAlign::Center)
    }
}

/// A logical section of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// The unsolved puzzle.
    Puzzle,
    /// Its solution.
    Solution,
}

impl Section {
    /// Name used in file names.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Puzzle => "puzzle",
            Self::Solution => "solution",
        }
    }

    /// Title of this section for the numbered puzzle.
    #[must_use]
    pub fn heading(self, style: &StyleParameters, numbering: Numbering) -> String {
        match self {
            Self::Puzzle => style.puzzle_heading(numbering.index, numbering.total),
            Self::Solution => style.solution_heading(numbering.index, numbering.total),
        }
    }
}

/// Position of a puzzle among those drawn from one payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbering {
    /// 1-based index.
    pub index: usize,
    /// How many puzzles the payload holds.
    pub total: usize,
}

impl Numbering {
    /// The `index`-th of `total`.
    #[must_use]
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// The only puzzle of a single-sheet payload.
    #[must_use]
    pub fn single() -> Self {
        Self::new(1, 1)
    }
}

/// Draw a section title at the top of the current page.
///
/// # Errors
///
/// Returns an error if the surface rejects the text.
pub fn draw_title<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    frame: &PageFrame,
    title: &str,
) -> RenderResult<()> {
    let mut style = ctx.title(frame);
    let width = surface.measure_text(title, &style);
    if width > frame.content.width && width > 0.0 {
        style.size *= frame.content.width / width;
    }
    surface.draw_text(
        title,
        Point::new(frame.page.width / 2.0, frame.title_baseline),
        &style,
    )
}

/// Start a section on a fresh page and draw its title.
///
/// # Errors
///
/// Returns an error if the page cannot be started or the title drawn.
pub fn begin_section<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    title: &str,
) -> RenderResult<PageFrame> {
    surface.begin_page()?;
    let frame = ctx.layout.frame(surface.page_size());
    draw_title(surface, ctx, &frame, title)?;
    tracing::debug!("Section '{title}' started on page {}", surface.page_count());
    Ok(frame)
}

/// Compose a payload into its artifact.
///
/// Returns `Ok(None)` when the payload has nothing to render.
///
/// # Errors
///
/// Returns an error if drawing or document serialization fails.
pub fn compose(payload: &PuzzlePayload, ctx: &ComposeContext<'_>) -> RenderResult<Option<Artifact>> {
    let kind = payload.kind();
    if !payload.can_generate() {
        tracing::debug!("{kind} payload has nothing to render");
        return Ok(None);
    }

    match payload {
        PuzzlePayload::WordSearch { puzzles } => {
            compose_raster(ctx, kind, puzzles, word_search::draw_section)
        }
        PuzzlePayload::Nurikabe { puzzles } => {
            compose_raster(ctx, kind, puzzles, nurikabe::draw_section)
        }
        PuzzlePayload::Hangman { puzzles } => {
            compose_document(ctx, kind, |surface| hangman::compose(surface, ctx, puzzles))
        }
        PuzzlePayload::Cryptogram { puzzles } => {
            compose_document(ctx, kind, |surface| cryptogram::compose(surface, ctx, puzzles))
        }
        PuzzlePayload::WordScramble { entries } => {
            compose_document(ctx, kind, |surface| scramble::compose(surface, ctx, entries))
        }
        PuzzlePayload::DotToDot(puzzle) => {
            compose_document(ctx, kind, |surface| dot_to_dot::compose(surface, ctx, puzzle))
        }
    }
}

/// Render each item's puzzle and solution sections onto their own surfaces.
fn compose_raster<T, F>(
    ctx: &ComposeContext<'_>,
    kind: PuzzleKind,
    items: &[T],
    draw: F,
) -> RenderResult<Option<Artifact>>
where
    F: Fn(&mut SvgSurface, &ComposeContext<'_>, &T, Section, Numbering) -> RenderResult<bool>,
{
    let mut pages = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let index = i + 1;
        for section in [Section::Puzzle, Section::Solution] {
            let mut surface = SvgSurface::new(ctx.layout.raster_page, ctx.fonts);
            if !draw(&mut surface, ctx, item, section, Numbering::new(index, items.len()))? {
                tracing::debug!("{kind} {index} {} skipped: nothing to render", section.slug());
                continue;
            }
            pages.extend(
                surface
                    .into_documents()
                    .into_iter()
                    .enumerate()
                    .map(|(part, svg)| RasterPage {
                        section,
                        index,
                        part: part + 1,
                        svg,
                    }),
            );
        }
    }

    if pages.is_empty() {
        return Ok(None);
    }
    tracing::info!("Composed {} {kind} image pages", pages.len());
    Ok(Some(Artifact::Images(ImageBatch::new(
        file_base(ctx.style, kind),
        pages,
        ctx.fonts.database(),
        ctx.layout.raster_scale,
    ))))
}

/// Render all sections into one PDF document.
fn compose_document<F>(
    ctx: &ComposeContext<'_>,
    kind: PuzzleKind,
    draw: F,
) -> RenderResult<Option<Artifact>>
where
    F: FnOnce(&mut PdfSurface) -> RenderResult<usize>,
{
    let title = file_base(ctx.style, kind);
    let mut surface = PdfSurface::new(title.as_str(), ctx.layout.document_page, ctx.fonts);
    let sections = draw(&mut surface)?;
    if sections == 0 || surface.page_count() == 0 {
        tracing::debug!("{kind} document has no sections");
        return Ok(None);
    }

    let pages = surface.page_count();
    let bytes = surface.finish()?;
    tracing::info!(
        "Composed {kind} document: {sections} sections, {pages} pages, {} bytes",
        bytes.len()
    );
    Ok(Some(Artifact::Document { title, bytes }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use usvg::fontdb;

    use crate::fonts::{FontProvisioner, FontRegistry, FontsReady, MemoryFontSource};

    /// Fonts provisioned without any system faces.
    pub async fn fonts(names: &[&str]) -> FontsReady {
        FontProvisioner::with_database(
            Arc::new(MemoryFontSource::new()),
            FontRegistry::new(),
            fontdb::Database::new(),
        )
        .ensure_fonts_ready(names.iter().copied())
        .await
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::{MarkerBoard, DotToDotPuzzle};

    use super::*;
    use crate::backend::recording::{DrawOp, RecordingSurface};

    #[test]
    fn test_section_headings() {
        let style = StyleParameters::default();
        assert_eq!(Section::Puzzle.heading(&style, Numbering::new(2, 2)), "Puzzle 2");
        assert_eq!(Section::Solution.heading(&style, Numbering::single()), "Solution 1");
        assert_eq!(Section::Solution.slug(), "solution");
    }

    #[tokio::test]
    async fn test_nothing_to_render_yields_none() {
        let fonts = test_support::fonts(&["arial"]).await;
        let style = StyleParameters::default();
        let layout = LayoutConfig::default();
        let ctx = ComposeContext::new(&style, &fonts, &layout);

        let empty = PuzzlePayload::DotToDot(DotToDotPuzzle {
            board: MarkerBoard::new(600.0, 400.0),
        });
        assert!(compose(&empty, &ctx).unwrap().is_none());

        let no_words = PuzzlePayload::WordScramble { entries: vec![] };
        assert!(compose(&no_words, &ctx).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_long_title_shrinks_to_content_width() {
        let fonts = test_support::fonts(&["arial"]).await;
        let style = StyleParameters::default();
        let layout = LayoutConfig::default();
        let ctx = ComposeContext::new(&style, &fonts, &layout);
        let mut surface = RecordingSurface::new(layout.document_page);

        let long = "Woodland Creatures Of The Northern Mountains And Misty Valleys";
        let frame = begin_section(&mut surface, &ctx, long).unwrap();
        draw_title(&mut surface, &ctx, &frame, "Short").unwrap();

        let titles: Vec<_> = surface.pages()[0]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, style, .. } => Some((text.clone(), style.clone())),
                _ => None,
            })
            .collect();
        let (text, shrunk) = &titles[0];
        assert!(shrunk.size < frame.title_size);
        assert!(surface.measure_text(text, shrunk) <= frame.content.width + 1e-3);
        assert!((titles[1].1.size - frame.title_size).abs() < f32::EPSILON);
    }
}
