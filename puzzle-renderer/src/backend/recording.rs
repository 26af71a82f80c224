//! A surface that records draw calls instead of drawing.
//!
//! Used by tests and by layout dry-runs: every call is kept as a [`DrawOp`]
//! on the page it was issued to.

use super::{Surface, TextStyle};
use crate::error::{RenderError, RenderResult};
use crate::geometry::{Color, Point, Rect};
use crate::layout::PageSize;
use crate::metrics::{self, MetricClass};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A stroked line.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke width.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// A filled rectangle.
    FillRect {
        /// Rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// A stroked rectangle.
    StrokeRect {
        /// Rectangle.
        rect: Rect,
        /// Stroke width.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// A filled circle.
    FillCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// A stroked circle.
    StrokeCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f32,
        /// Stroke width.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// A text run.
    Text {
        /// The text.
        text: String,
        /// Baseline anchor.
        at: Point,
        /// Style it was drawn in.
        style: TextStyle,
    },
}

impl DrawOp {
    /// Text of a text op.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Surface that records [`DrawOp`]s per page.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: PageSize,
    pages: Vec<Vec<DrawOp>>,
}

impl RecordingSurface {
    /// Create an empty recording.
    #[must_use]
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            pages: Vec::new(),
        }
    }

    /// Recorded pages.
    #[must_use]
    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// Every recorded op, in order.
    pub fn ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.pages.iter().flatten()
    }

    /// Every text run on a page.
    #[must_use]
    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|ops| ops.iter().filter_map(DrawOp::text).collect())
            .unwrap_or_default()
    }

    fn record(&mut self, op: DrawOp) -> RenderResult<()> {
        let page = self.pages.last_mut().ok_or_else(|| {
            RenderError::SurfaceUnavailable("no page has been started".to_string())
        })?;
        page.push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn begin_page(&mut self) -> RenderResult<()> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self) -> PageSize {
        self.size
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) -> RenderResult<()> {
        self.record(DrawOp::Line {
            from,
            to,
            width,
            color,
        })
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()> {
        self.record(DrawOp::FillRect { rect, color })
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) -> RenderResult<()> {
        self.record(DrawOp::StrokeRect { rect, width, color })
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> RenderResult<()> {
        self.record(DrawOp::FillCircle {
            center,
            radius,
            color,
        })
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Color,
    ) -> RenderResult<()> {
        self.record(DrawOp::StrokeCircle {
            center,
            radius,
            width,
            color,
        })
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()> {
        self.record(DrawOp::Text {
            text: text.to_string(),
            at,
            style: style.clone(),
        })
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f32 {
        metrics::measure(text, style.size, MetricClass::for_family(&style.font))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_per_page() {
        let mut surface = RecordingSurface::new(PageSize::A4);
        assert!(surface
            .fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK)
            .is_err());

        surface.begin_page().unwrap();
        surface
            .draw_text("one", Point::new(0.0, 10.0), &TextStyle::new("arial", 10.0))
            .unwrap();
        surface.begin_page().unwrap();
        surface
            .draw_text("two", Point::new(0.0, 10.0), &TextStyle::new("arial", 10.0))
            .unwrap();

        assert_eq!(surface.page_count(), 2);
        assert_eq!(surface.texts_on(0), vec!["one"]);
        assert_eq!(surface.texts_on(1), vec!["two"]);
        assert!(surface.texts_on(2).is_empty());
    }
}
