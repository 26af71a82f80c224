//! Column and page flow for variable-length content.
//!
//! Content is a sequence of indivisible units (a word-list row, a scrambled
//! word line). Each unit goes at the cursor if it fits; otherwise the cursor
//! moves to the next column, and past the last column to a new page, where
//! the section header is redrawn.
//!
//! A unit taller than a whole column is placed at the top of the content
//! area of a fresh column. It is never split and never causes a second
//! advance. Any other unit always ends above the content bottom, including
//! the first unit after [`FlowController::starting_at`].

use crate::backend::Surface;
use crate::error::RenderResult;
use crate::layout::PageFrame;

/// Slack allowed when testing whether a unit fits, absorbing float drift
/// from accumulated unit heights.
const FIT_TOLERANCE: f32 = 1e-3;

/// Columns of a paginated section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    /// Left edge of the first column.
    pub left: f32,
    /// Top of the content area on continuation pages.
    pub content_top: f32,
    /// Bottom limit of every column.
    pub content_bottom: f32,
    /// Width of one column.
    pub column_width: f32,
    /// Horizontal gap between columns.
    pub column_gap: f32,
    /// Number of columns per page.
    pub columns: usize,
}

impl ColumnLayout {
    /// Split a page's content area into `columns` equal columns.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_frame(frame: &PageFrame, columns: usize, column_gap: f32) -> Self {
        let columns = columns.max(1);
        let gaps = column_gap * (columns - 1) as f32;
        Self {
            left: frame.content.x,
            content_top: frame.content.y,
            content_bottom: frame.content.bottom(),
            column_width: ((frame.content.width - gaps) / columns as f32).max(0.0),
            column_gap,
            columns,
        }
    }

    /// Left edge of a column.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn column_x(&self, column: usize) -> f32 {
        self.left + (self.column_width + self.column_gap) * column as f32
    }

    /// Height available to a column on a continuation page.
    #[must_use]
    pub fn column_height(&self) -> f32 {
        (self.content_bottom - self.content_top).max(0.0)
    }

    /// How many units of `unit_height` fit in one column (at least one).
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn capacity(&self, unit_height: f32) -> usize {
        if unit_height <= 0.0 || !unit_height.is_finite() {
            return 1;
        }
        (((self.column_height() + FIT_TOLERANCE) / unit_height).floor() as usize).max(1)
    }
}

/// Where the next unit would go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    /// Next free y position.
    pub y: f32,
    /// Current column index.
    pub column: usize,
    /// Current page index (surface page numbering).
    pub page: usize,
    /// Top of the columns on the current page.
    pub column_top: f32,
}

/// What the cursor did before placing a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Placed in the current column.
    None,
    /// Moved to the next column on the same page.
    Column,
    /// Moved to the first column of a new page.
    Page,
}

/// Position assigned to one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Page the unit is on.
    pub page: usize,
    /// Column the unit is in.
    pub column: usize,
    /// Left edge of the unit.
    pub x: f32,
    /// Top of the unit.
    pub y: f32,
    /// Movement performed before placing.
    pub advance: Advance,
}

/// Assigns positions to a stream of units.
#[derive(Debug, Clone)]
pub struct FlowController {
    layout: ColumnLayout,
    cursor: LayoutCursor,
}

impl FlowController {
    /// Start flowing on `first_page` at the top of the content area.
    #[must_use]
    pub fn new(layout: ColumnLayout, first_page: usize) -> Self {
        Self {
            layout,
            cursor: LayoutCursor {
                y: layout.content_top,
                column: 0,
                page: first_page,
                column_top: layout.content_top,
            },
        }
    }

    /// Start the current page's columns at `y` (below a grid, say).
    ///
    /// Continuation pages still start at the layout's content top.
    #[must_use]
    pub fn starting_at(mut self, y: f32) -> Self {
        self.cursor.y = y;
        self.cursor.column_top = y;
        self
    }

    /// Begin a fresh logical section on `first_page`.
    pub fn reset(&mut self, first_page: usize) {
        *self = Self::new(self.layout, first_page);
    }

    /// Current cursor.
    #[must_use]
    pub fn cursor(&self) -> LayoutCursor {
        self.cursor
    }

    /// The column layout.
    #[must_use]
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Place a unit of `height` and move the cursor past it.
    pub fn place(&mut self, height: f32) -> Placement {
        let (placement, next) = self.plan(height);
        match placement.advance {
            Advance::None => {}
            Advance::Column => tracing::debug!(
                "Flow advanced to column {} on page {}",
                placement.column,
                placement.page
            ),
            Advance::Page => tracing::debug!("Flow advanced to page {}", placement.page),
        }
        self.cursor = next;
        placement
    }

    /// Place a unit, starting a new page on `surface` and redrawing the
    /// section header when the unit does not fit on the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot start a page or the header
    /// fails to draw.
    pub fn flow<S, F>(
        &mut self,
        surface: &mut S,
        height: f32,
        header: &mut F,
    ) -> RenderResult<Placement>
    where
        S: Surface + ?Sized,
        F: FnMut(&mut S) -> RenderResult<()>,
    {
        let placement = self.place(height);
        if placement.advance == Advance::Page {
            surface.begin_page()?;
            header(surface)?;
        }
        Ok(placement)
    }

    fn plan(&self, height: f32) -> (Placement, LayoutCursor) {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        let c = self.cursor;
        let bottom = self.layout.content_bottom + FIT_TOLERANCE;
        let oversized = height > self.layout.column_height() + FIT_TOLERANCE;
        // Only a unit taller than a whole column may overflow, and only from
        // the very top of the content area.
        let accepts = |y: f32| {
            let at_top = (y - self.layout.content_top).abs() <= f32::EPSILON;
            y + height <= bottom || (oversized && at_top)
        };

        let (advance, column, page, top) = if accepts(c.y) {
            (Advance::None, c.column, c.page, c.column_top)
        } else if c.column + 1 < self.layout.columns && accepts(c.column_top) {
            (Advance::Column, c.column + 1, c.page, c.column_top)
        } else {
            (Advance::Page, 0, c.page + 1, self.layout.content_top)
        };
        let y = if advance == Advance::None { c.y } else { top };

        let placement = Placement {
            page,
            column,
            x: self.layout.column_x(column),
            y,
            advance,
        };
        let next = LayoutCursor {
            y: y + height,
            column,
            page,
            column_top: top,
        };
        (placement, next)
    }
}
