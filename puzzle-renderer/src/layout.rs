//! Page geometry and layout tunables.

use crate::geometry::Rect;

/// Page dimensions in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
}

impl PageSize {
    /// A4 portrait in PDF points.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// Default raster page in pixels (A4 proportions).
    pub const RASTER: PageSize = PageSize {
        width: 1000.0,
        height: 1414.0,
    };

    /// Create a page size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Spacing, sizes and column counts used by the composers.
///
/// Values are fractions of the page or absolute surface units, so the same
/// config works for point-based documents and pixel-based images.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Page used for vector documents.
    pub document_page: PageSize,
    /// Page used for raster images.
    pub raster_page: PageSize,
    /// Margin as a fraction of page width.
    pub margin_ratio: f32,
    /// Section title size as a fraction of page width.
    pub title_ratio: f32,
    /// Body text size as a fraction of page width.
    pub body_ratio: f32,
    /// Vertical band reserved for the title, in title heights.
    pub title_band: f32,
    /// Columns in the word list beneath a word-search grid.
    pub word_list_columns: usize,
    /// Word-list row height, in body sizes.
    pub word_list_line_height: f32,
    /// Text columns on scrambled-word pages.
    pub scramble_columns: usize,
    /// Scrambled-word line height, in body sizes.
    pub scramble_line_height: f32,
    /// Pixel scale applied when rasterizing pages.
    pub raster_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            document_page: PageSize::A4,
            raster_page: PageSize::RASTER,
            margin_ratio: 0.07,
            title_ratio: 0.045,
            body_ratio: 0.024,
            title_band: 2.2,
            word_list_columns: 4,
            word_list_line_height: 1.8,
            scramble_columns: 2,
            scramble_line_height: 2.4,
            raster_scale: 1.0,
        }
    }
}

/// Resolved measurements for one page size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// Full page.
    pub page: PageSize,
    /// Margin on every side.
    pub margin: f32,
    /// Title text size.
    pub title_size: f32,
    /// Body text size.
    pub body_size: f32,
    /// Baseline of the section title.
    pub title_baseline: f32,
    /// Area below the title band and inside the margins.
    pub content: Rect,
}

impl LayoutConfig {
    /// Measurements for a page.
    #[must_use]
    pub fn frame(&self, page: PageSize) -> PageFrame {
        let margin = page.width * self.margin_ratio;
        let title_size = page.width * self.title_ratio;
        let body_size = page.width * self.body_ratio;
        let content_top = margin + title_size * self.title_band;
        PageFrame {
            page,
            margin,
            title_size,
            body_size,
            title_baseline: margin + title_size,
            content: Rect::new(
                margin,
                content_top,
                page.width - margin * 2.0,
                (page.height - margin - content_top).max(0.0),
            ),
        }
    }
}
