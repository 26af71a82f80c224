//! Dot-to-dot: numbered markers scaled onto the page, joined in order in
//! the solution; plus the interactive preview of the marker board.

use base64::Engine;
use puzzle_core::{DotToDotPuzzle, MarkerBoard};

use super::{begin_section, ComposeContext, Numbering, Section};
use crate::backend::svg::{render_png, SvgSurface};
use crate::backend::{Surface, TextStyle};
use crate::error::{RenderError, RenderResult};
use crate::fonts::FontsReady;
use crate::geometry::{Color, Point, Rect};
use crate::layout::PageSize;
use crate::sizing::{marker_metrics, MarkerMetrics, SizingTarget};

/// Maps board coordinates onto a target rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardTransform {
    /// Where board (0, 0) lands.
    pub origin: Point,
    /// Uniform scale from board units.
    pub scale: f32,
}

impl BoardTransform {
    /// Fit a `width × height` board into `target`, centered horizontally and
    /// top-aligned, preserving aspect ratio.
    #[must_use]
    pub fn fit(width: f32, height: f32, target: Rect) -> Self {
        let scale = if width > 0.0 && height > 0.0 {
            (target.width / width).min(target.height / height)
        } else {
            1.0
        };
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            origin: Point::new(target.x + (target.width - width * scale).max(0.0) / 2.0, target.y),
            scale,
        }
    }

    /// Board point in target coordinates.
    #[must_use]
    pub fn apply(&self, x: f32, y: f32) -> Point {
        self.origin.offset(Point::new(x * self.scale, y * self.scale))
    }
}

/// Draw the puzzle section and then the solution section.
///
/// Returns zero sections when there are no markers.
///
/// # Errors
///
/// Returns an error if the surface rejects a draw call.
pub fn compose<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    puzzle: &DotToDotPuzzle,
) -> RenderResult<usize> {
    if !puzzle.can_generate() {
        return Ok(0);
    }
    for section in [Section::Puzzle, Section::Solution] {
        let frame = begin_section(surface, ctx, &section.heading(ctx.style, Numbering::single()))?;
        let board = &puzzle.board;
        let transform = BoardTransform::fit(board.width, board.height, frame.content);
        let area = board.width * board.height * transform.scale * transform.scale;
        let metrics = marker_metrics(board.len(), area, SizingTarget::Print);
        tracing::debug!(
            "Dot-to-dot {}: {} markers, radius {:.2}",
            section.slug(),
            board.len(),
            metrics.radius
        );

        if section == Section::Solution {
            draw_path(surface, board, &transform, metrics)?;
        }
        draw_markers(surface, board, &transform, metrics, ctx.style.font_family.as_str())?;
    }
    Ok(2)
}

fn draw_path<S: Surface + ?Sized>(
    surface: &mut S,
    board: &MarkerBoard,
    transform: &BoardTransform,
    metrics: MarkerMetrics,
) -> RenderResult<()> {
    let width = (metrics.radius * 0.35).max(0.75);
    for pair in board.markers().windows(2) {
        surface.draw_line(
            transform.apply(pair[0].x, pair[0].y),
            transform.apply(pair[1].x, pair[1].y),
            width,
            Color::GREY,
        )?;
    }
    Ok(())
}

fn draw_markers<S: Surface + ?Sized>(
    surface: &mut S,
    board: &MarkerBoard,
    transform: &BoardTransform,
    metrics: MarkerMetrics,
    font: &str,
) -> RenderResult<()> {
    let label = TextStyle::new(font, metrics.font_size);
    if let Some(first) = board.markers().first() {
        // Ring around the starting dot.
        surface.stroke_circle(
            transform.apply(first.x, first.y),
            metrics.radius * 2.0,
            (metrics.radius * 0.3).max(0.5),
            Color::BLACK,
        )?;
    }
    for (i, marker) in board.markers().iter().enumerate() {
        let center = transform.apply(marker.x, marker.y);
        surface.fill_circle(center, metrics.radius, Color::BLACK)?;
        surface.draw_text(
            &(i + 1).to_string(),
            center.shifted(metrics.radius * 1.3, -metrics.radius * 0.6),
            &label,
        )?;
    }
    Ok(())
}

/// Preview of the marker board as the editor shows it.
#[derive(Debug, Clone)]
pub struct Preview {
    /// SVG document.
    pub svg: String,
    /// Rasterized PNG.
    pub png: Vec<u8>,
}

/// Render the marker board at its own size with preview-sized markers,
/// over an optional background image given as a `data:` URI.
///
/// A background that cannot be decoded is skipped with a warning.
///
/// # Errors
///
/// Returns an error if rasterization fails.
pub fn render_preview(
    board: &MarkerBoard,
    fonts: &FontsReady,
    font: &str,
    background: Option<&str>,
) -> RenderResult<Preview> {
    let page = PageSize::new(board.width.max(1.0), board.height.max(1.0));
    let mut surface = SvgSurface::new(page, fonts);
    surface.begin_page()?;

    if let Some(uri) = background {
        match image_dimensions(uri) {
            Ok((w, h)) => {
                #[allow(clippy::cast_precision_loss)]
                let fit = BoardTransform::fit(w as f32, h as f32, Rect::new(0.0, 0.0, page.width, page.height));
                #[allow(clippy::cast_precision_loss)]
                let rect = Rect::new(fit.origin.x, fit.origin.y, w as f32 * fit.scale, h as f32 * fit.scale);
                surface.draw_image(rect, uri)?;
            }
            Err(e) => tracing::warn!("Preview background skipped: {e}"),
        }
    }

    let metrics = marker_metrics(board.len(), page.width * page.height, SizingTarget::Preview);
    let identity = BoardTransform {
        origin: Point::default(),
        scale: 1.0,
    };
    draw_markers(&mut surface, board, &identity, metrics, font)?;

    let database = surface.database();
    let svg = surface
        .into_documents()
        .pop()
        .ok_or_else(|| RenderError::SurfaceUnavailable("preview has no page".to_string()))?;
    let png = render_png(&svg, database, 1.0)?;
    Ok(Preview { svg, png })
}

/// Decode a base64 `data:` URI far enough to learn the image size.
fn image_dimensions(uri: &str) -> RenderResult<(u32, u32)> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, data)| data)
        .ok_or_else(|| RenderError::Resource("background is not a base64 data URI".to_string()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::Resource(format!("background base64: {e}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| RenderError::Resource(format!("background image: {e}")))?;
    Ok((image.width(), image.height()))
}
