//! SVG page surface with PNG rasterization.
//!
//! Each page is accumulated as an SVG document string and rasterized through
//! the usvg/resvg/tiny-skia pipeline, using the provisioned font database so
//! registered custom faces are available to the text layout.

use std::fmt::Write;
use std::sync::Arc;

use usvg::fontdb;

use super::{Surface, TextAlign, TextStyle};
use crate::error::{RenderError, RenderResult};
use crate::fonts::FontsReady;
use crate::geometry::{Color, Point, Rect};
use crate::layout::PageSize;
use crate::metrics;

/// Generic family appended after every named family.
const FALLBACK_FAMILY: &str = "sans-serif";

/// Surface that produces one SVG document per page.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: PageSize,
    fonts: FontsReady,
    background: Color,
    pages: Vec<String>,
}

impl SvgSurface {
    /// Create a surface with white pages.
    #[must_use]
    pub fn new(size: PageSize, fonts: &FontsReady) -> Self {
        Self {
            size,
            fonts: fonts.clone(),
            background: Color::WHITE,
            pages: Vec::new(),
        }
    }

    /// Draw an image (typically a `data:` URI) stretched into `rect`.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    pub fn draw_image(&mut self, rect: Rect, href: &str) -> RenderResult<()> {
        let body = self.current()?;
        let _ = write!(
            body,
            "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"{}\"/>",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            escape_xml(href),
        );
        Ok(())
    }

    /// Finished SVG documents, one per page.
    #[must_use]
    pub fn into_documents(self) -> Vec<String> {
        let (w, h) = (self.size.width, self.size.height);
        self.pages
            .into_iter()
            .map(|body| {
                let mut svg = String::with_capacity(body.len() + 256);
                let _ = write!(
                    svg,
                    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
                );
                svg.push_str(&body);
                svg.push_str("</svg>");
                svg
            })
            .collect()
    }

    /// Font database pages are rasterized with.
    #[must_use]
    pub fn database(&self) -> Arc<fontdb::Database> {
        self.fonts.database()
    }

    fn current(&mut self) -> RenderResult<&mut String> {
        self.pages.last_mut().ok_or_else(|| {
            RenderError::SurfaceUnavailable("no page has been started".to_string())
        })
    }
}

impl Surface for SvgSurface {
    fn begin_page(&mut self) -> RenderResult<()> {
        let mut body = String::with_capacity(4096);
        let _ = write!(
            body,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            self.background.to_hex()
        );
        self.pages.push(body);
        tracing::trace!("SVG page {} started", self.pages.len());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self) -> PageSize {
        self.size
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) -> RenderResult<()> {
        let body = self.current()?;
        let _ = write!(
            body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{width}\" stroke-linecap=\"square\"/>",
            from.x,
            from.y,
            to.x,
            to.y,
            color.to_hex(),
        );
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()> {
        let body = self.current()?;
        let _ = write!(
            body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            color.to_hex(),
        );
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) -> RenderResult<()> {
        let body = self.current()?;
        let _ = write!(
            body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\"/>",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            color.to_hex(),
        );
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> RenderResult<()> {
        let body = self.current()?;
        let _ = write!(
            body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{radius}\" fill=\"{}\"/>",
            center.x,
            center.y,
            color.to_hex(),
        );
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Color,
    ) -> RenderResult<()> {
        let body = self.current()?;
        let _ = write!(
            body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{radius}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\"/>",
            center.x,
            center.y,
            color.to_hex(),
        );
        Ok(())
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()> {
        let family = escape_xml(&self.fonts.resolve(&style.font).family);
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let body = self.current()?;
        let _ = write!(
            body,
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{anchor}\" font-family=\"'{family}', {FALLBACK_FAMILY}\">{}</text>",
            at.x,
            at.y,
            style.size,
            style.color.to_hex(),
            escape_xml(text),
        );
        Ok(())
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f32 {
        let class = self.fonts.resolve(&style.font).metric_class();
        metrics::measure(text, style.size, class)
    }
}

/// Rasterize an SVG document to a pixmap at `scale` pixels per unit.
///
/// # Errors
///
/// Returns an error if the SVG cannot be parsed or the pixmap cannot be
/// allocated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rasterize(
    svg: &str,
    database: Arc<fontdb::Database>,
    scale: f32,
) -> RenderResult<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb = database;
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let px_w = (tree.size().width() * scale).ceil() as u32;
    let px_h = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    Ok(pixmap)
}

/// Rasterize an SVG document and encode it as PNG.
///
/// # Errors
///
/// Returns an error if rasterization or encoding fails.
pub fn render_png(svg: &str, database: Arc<fontdb::Database>, scale: f32) -> RenderResult<Vec<u8>> {
    rasterize(svg, database, scale)?
        .encode_png()
        .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FontProvisioner, FontRegistry, MemoryFontSource};

    async fn fonts() -> FontsReady {
        FontProvisioner::with_database(
            Arc::new(MemoryFontSource::new()),
            FontRegistry::new(),
            fontdb::Database::new(),
        )
        .ensure_fonts_ready(["arial"])
        .await
    }

    #[tokio::test]
    async fn test_drawing_before_page_fails() {
        let mut surface = SvgSurface::new(PageSize::new(100.0, 100.0), &fonts().await);
        let err = surface
            .fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK)
            .unwrap_err();
        assert!(matches!(err, RenderError::SurfaceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_text_is_escaped_and_anchored() {
        let mut surface = SvgSurface::new(PageSize::new(200.0, 100.0), &fonts().await);
        surface.begin_page().unwrap();
        let style = TextStyle::new("arial", 12.0).aligned(TextAlign::Center);
        surface
            .draw_text("Tom & <Jerry>", Point::new(100.0, 50.0), &style)
            .unwrap();

        let docs = surface.into_documents();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(docs[0].contains("text-anchor=\"middle\""));
        assert!(docs[0].contains("'Arial', sans-serif"));
    }

    #[tokio::test]
    async fn test_each_page_is_a_document() {
        let mut surface = SvgSurface::new(PageSize::new(50.0, 80.0), &fonts().await);
        surface.begin_page().unwrap();
        surface.begin_page().unwrap();
        let docs = surface.into_documents();
        assert_eq!(docs.len(), 2);
        for doc in &docs {
            assert!(doc.starts_with("<svg"));
            assert!(doc.ends_with("</svg>"));
            assert!(doc.contains("viewBox=\"0 0 50 80\""));
        }
    }

    #[tokio::test]
    async fn test_png_has_signature_and_scaled_size() {
        let ready = fonts().await;
        let mut surface = SvgSurface::new(PageSize::new(40.0, 30.0), &ready);
        surface.begin_page().unwrap();
        surface
            .draw_line(Point::new(0.0, 0.0), Point::new(40.0, 30.0), 2.0, Color::BLACK)
            .unwrap();
        let svg = surface.into_documents().remove(0);

        let pixmap = rasterize(&svg, ready.database(), 2.0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (80, 60));

        let png = render_png(&svg, ready.database(), 1.0).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a\"b'c"), "a&quot;b&apos;c");
    }
}
