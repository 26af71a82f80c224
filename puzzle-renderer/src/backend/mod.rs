//! Drawing surfaces.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                Surface trait                  │
//! ├───────────────┬───────────────┬───────────────┤
//! │ PdfSurface    │ SvgSurface    │ Recording     │
//! │ (documents)   │ (PNG pages)   │ (tests)       │
//! └───────────────┴───────────────┴───────────────┘
//! ```
//!
//! Composers, the grid renderer and the pagination controller take a
//! `&mut S where S: Surface` instead of holding a surface, so any backend
//! (or the recording double) can be substituted.

pub mod pdf;
pub mod recording;
pub mod svg;

use crate::error::RenderResult;
use crate::geometry::{Color, Point, Rect};
use crate::layout::PageSize;

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// `at.x` is the left edge.
    #[default]
    Left,
    /// `at.x` is the center.
    Center,
    /// `at.x` is the right edge.
    Right,
}

/// Font, size, alignment and color of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Requested font name.
    pub font: String,
    /// Font size in surface units.
    pub size: f32,
    /// Alignment relative to the anchor point.
    pub align: TextAlign,
    /// Fill color.
    pub color: Color,
}

impl TextStyle {
    /// Black, left-aligned text.
    #[must_use]
    pub fn new(font: impl Into<String>, size: f32) -> Self {
        Self {
            font: font.into(),
            size,
            align: TextAlign::Left,
            color: Color::BLACK,
        }
    }

    /// Same style with another alignment.
    #[must_use]
    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Same style with another size.
    #[must_use]
    pub fn sized(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Same style with another color.
    #[must_use]
    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A 2-D drawing surface with pages.
///
/// `at` for text is the baseline anchor. All drawing calls fail with
/// [`crate::RenderError::SurfaceUnavailable`] before the first page begins.
pub trait Surface {
    /// Start a new page; subsequent drawing goes to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot add a page.
    fn begin_page(&mut self) -> RenderResult<()>;

    /// Number of pages begun so far.
    fn page_count(&self) -> usize;

    /// Size of every page.
    fn page_size(&self) -> PageSize;

    /// Stroke a straight line.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) -> RenderResult<()>;

    /// Fill a rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()>;

    /// Stroke a rectangle outline.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) -> RenderResult<()>;

    /// Fill a circle.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> RenderResult<()>;

    /// Stroke a circle outline.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Color,
    ) -> RenderResult<()>;

    /// Draw a text run anchored at its baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()>;

    /// Width of a text run in this style.
    fn measure_text(&self, text: &str, style: &TextStyle) -> f32;
}

/// Left edge of a run of `width` anchored at `x`.
#[must_use]
pub fn aligned_left(x: f32, width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    }
}

/// Baseline that vertically centers a glyph of `size` on `center_y`.
#[must_use]
pub fn centered_baseline(center_y: f32, size: f32) -> f32 {
    center_y + size * 0.35
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_left() {
        assert!((aligned_left(100.0, 40.0, TextAlign::Left) - 100.0).abs() < f32::EPSILON);
        assert!((aligned_left(100.0, 40.0, TextAlign::Center) - 80.0).abs() < f32::EPSILON);
        assert!((aligned_left(100.0, 40.0, TextAlign::Right) - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_text_style_builders() {
        let style = TextStyle::new("arial", 12.0)
            .aligned(TextAlign::Center)
            .sized(20.0)
            .colored(Color::GREY);
        assert_eq!(style.align, TextAlign::Center);
        assert!((style.size - 20.0).abs() < f32::EPSILON);
        assert_eq!(style.color, Color::GREY);
    }
}
