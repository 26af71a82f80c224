//! Multi-page PDF surface.
//!
//! Surface units are PDF points with the y axis pointing down; printpdf
//! works in millimetres from the bottom-left corner, so every coordinate is
//! converted and flipped at this boundary.

use std::collections::HashMap;
use std::f32::consts::TAU;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Polygon, Rgb,
};

use super::{aligned_left, Surface, TextStyle};
use crate::error::{RenderError, RenderResult};
use crate::fonts::{BuiltinFace, FontsReady, ResolvedFont};
use crate::geometry::{Color, Point, Rect};
use crate::layout::PageSize;
use crate::metrics;

const LAYER_NAME: &str = "Layer 1";
const CIRCLE_SEGMENTS: usize = 24;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn pdf_color(color: Color) -> printpdf::Color {
    let (r, g, b) = color.to_unit();
    printpdf::Color::Rgb(Rgb::new(r, g, b, None))
}

fn builtin(face: BuiltinFace) -> BuiltinFont {
    match face {
        BuiltinFace::Helvetica => BuiltinFont::Helvetica,
        BuiltinFace::TimesRoman => BuiltinFont::TimesRoman,
        BuiltinFace::Courier => BuiltinFont::Courier,
    }
}

struct OpenDocument {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
}

/// Surface that builds one PDF document.
///
/// The document itself is created with its first page, so a surface that
/// never begins a page has nothing to save.
pub struct PdfSurface {
    title: String,
    size: PageSize,
    fonts: FontsReady,
    open: Option<OpenDocument>,
    font_refs: HashMap<String, IndirectFontRef>,
}

impl PdfSurface {
    /// Create a surface for a titled document.
    #[must_use]
    pub fn new(title: impl Into<String>, size: PageSize, fonts: &FontsReady) -> Self {
        Self {
            title: title.into(),
            size,
            fonts: fonts.clone(),
            open: None,
            font_refs: HashMap::new(),
        }
    }

    /// Serialize the finished document.
    ///
    /// # Errors
    ///
    /// Returns an error if no page was ever started or serialization fails.
    pub fn finish(self) -> RenderResult<Vec<u8>> {
        let open = self.open.ok_or_else(|| {
            RenderError::SurfaceUnavailable("document has no pages".to_string())
        })?;
        tracing::debug!("Saving PDF '{}' with {} pages", self.title, open.pages.len());
        open.doc
            .save_to_bytes()
            .map_err(|e| RenderError::Export(format!("PDF save failed: {e}")))
    }

    fn layer(&self) -> RenderResult<PdfLayerReference> {
        let open = self.open.as_ref().ok_or_else(|| {
            RenderError::SurfaceUnavailable("no page has been started".to_string())
        })?;
        let (page, layer) = open.pages.last().copied().ok_or_else(|| {
            RenderError::SurfaceUnavailable("no page has been started".to_string())
        })?;
        Ok(open.doc.get_page(page).get_layer(layer))
    }

    fn point(&self, p: Point) -> printpdf::Point {
        printpdf::Point::new(mm(p.x), mm(self.size.height - p.y))
    }

    fn ring(&self, points: &[Point]) -> Vec<(printpdf::Point, bool)> {
        points.iter().map(|p| (self.point(*p), false)).collect()
    }

    fn rect_points(rect: Rect) -> [Point; 4] {
        [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
        ]
    }

    #[allow(clippy::cast_precision_loss)]
    fn circle_points(center: Point, radius: f32) -> Vec<Point> {
        (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
                Point::new(
                    radius.mul_add(angle.cos(), center.x),
                    radius.mul_add(angle.sin(), center.y),
                )
            })
            .collect()
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> RenderResult<()> {
        let layer = self.layer()?;
        layer.set_fill_color(pdf_color(color));
        layer.add_polygon(Polygon {
            rings: vec![self.ring(points)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        Ok(())
    }

    fn stroke_path(
        &mut self,
        points: &[Point],
        closed: bool,
        width: f32,
        color: Color,
    ) -> RenderResult<()> {
        let layer = self.layer()?;
        layer.set_outline_color(pdf_color(color));
        layer.set_outline_thickness(width);
        layer.add_line(Line {
            points: self.ring(points),
            is_closed: closed,
        });
        Ok(())
    }

    /// Font reference for a resolved font, adding it to the document once.
    fn font_ref(&mut self, font: &ResolvedFont) -> RenderResult<IndirectFontRef> {
        let key = font.requested.trim().to_ascii_lowercase();
        if let Some(existing) = self.font_refs.get(&key) {
            return Ok(existing.clone());
        }
        let open = self.open.as_ref().ok_or_else(|| {
            RenderError::SurfaceUnavailable("no page has been started".to_string())
        })?;

        let embedded = font.data.as_ref().and_then(|data| {
            open.doc
                .add_external_font(data.as_slice())
                .map_err(|e| {
                    tracing::warn!(
                        "Embedding font '{}' failed, using built-in face: {e}",
                        font.family
                    );
                })
                .ok()
        });
        let font_ref = match embedded {
            Some(r) => r,
            None => open
                .doc
                .add_builtin_font(builtin(font.builtin))
                .map_err(|e| RenderError::Font {
                    name: font.requested.clone(),
                    reason: e.to_string(),
                })?,
        };
        self.font_refs.insert(key, font_ref.clone());
        Ok(font_ref)
    }
}

impl Surface for PdfSurface {
    fn begin_page(&mut self) -> RenderResult<()> {
        let (w, h) = (mm(self.size.width), mm(self.size.height));
        match self.open.as_mut() {
            Some(open) => {
                let (page, layer) = open.doc.add_page(w, h, LAYER_NAME);
                open.pages.push((page, layer));
            }
            None => {
                let (doc, page, layer) = PdfDocument::new(self.title.as_str(), w, h, LAYER_NAME);
                self.open = Some(OpenDocument {
                    doc,
                    pages: vec![(page, layer)],
                });
            }
        }
        tracing::trace!("PDF page {} started", self.page_count());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.open.as_ref().map_or(0, |open| open.pages.len())
    }

    fn page_size(&self) -> PageSize {
        self.size
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) -> RenderResult<()> {
        self.stroke_path(&[from, to], false, width, color)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()> {
        self.fill_polygon(&Self::rect_points(rect), color)
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) -> RenderResult<()> {
        self.stroke_path(&Self::rect_points(rect), true, width, color)
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> RenderResult<()> {
        self.fill_polygon(&Self::circle_points(center, radius), color)
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Color,
    ) -> RenderResult<()> {
        self.stroke_path(&Self::circle_points(center, radius), true, width, color)
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()> {
        let layer = self.layer()?;
        let font = self.fonts.resolve(&style.font);
        let font_ref = self.font_ref(&font)?;
        let width = metrics::measure(text, style.size, font.metric_class());
        let x = mm(aligned_left(at.x, width, style.align));
        let y = mm(self.size.height - at.y);

        layer.set_fill_color(pdf_color(style.color));
        layer.use_text(text, style.size, x, y, &font_ref);
        Ok(())
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f32 {
        let class = self.fonts.resolve(&style.font).metric_class();
        metrics::measure(text, style.size, class)
    }
}
