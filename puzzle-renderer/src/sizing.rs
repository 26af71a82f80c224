//! Adaptive element sizing.
//!
//! Marker radii shrink as the number of markers grows and grow with the
//! drawing area; grid cells shrink to fit the grid into the available box.

/// Which kind of target the size is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingTarget {
    /// Interactive/preview raster canvas.
    Preview,
    /// Vector document output.
    Print,
}

/// Area the base radius band is tuned for (600 × 600).
pub const REFERENCE_AREA: f32 = 360_000.0;
/// Numerator of the inverse-square-root count curve.
pub const COUNT_SCALE: f32 = 60.0;
/// Smallest base radius before area scaling.
pub const MIN_BASE_RADIUS: f32 = 3.0;
/// Largest base radius before area scaling.
pub const MAX_BASE_RADIUS: f32 = 12.0;
/// Smallest area multiplier.
pub const MIN_AREA_FACTOR: f32 = 0.5;
/// Largest area multiplier.
pub const MAX_AREA_FACTOR: f32 = 2.0;
/// Print radius as a fraction of the preview radius.
pub const PRINT_RATIO: f32 = 0.6;
/// Print radius floor.
pub const PRINT_MIN_RADIUS: f32 = 2.0;
/// Radius used when there are no markers, for previews.
pub const DEFAULT_PREVIEW_RADIUS: f32 = 8.0;
/// Radius used when there are no markers, for print.
pub const DEFAULT_PRINT_RADIUS: f32 = 5.0;
/// Label size as a multiple of the radius.
pub const FONT_PER_RADIUS: f32 = 1.6;
/// Smallest legible label size.
pub const MIN_FONT_SIZE: f32 = 6.0;

/// Smallest grid cell.
pub const MIN_CELL: f32 = 12.0;
/// Largest grid cell.
pub const MAX_CELL: f32 = 60.0;
/// Glyph size as a fraction of the cell.
pub const GLYPH_PER_CELL: f32 = 0.6;

/// Radius and label size for a set of markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerMetrics {
    /// Dot radius.
    pub radius: f32,
    /// Number label size.
    pub font_size: f32,
}

/// Inclusive radius band for a target.
#[must_use]
pub fn radius_band(target: SizingTarget) -> (f32, f32) {
    let preview = (
        MIN_BASE_RADIUS * MIN_AREA_FACTOR,
        MAX_BASE_RADIUS * MAX_AREA_FACTOR,
    );
    match target {
        SizingTarget::Preview => preview,
        SizingTarget::Print => (
            (preview.0 * PRINT_RATIO).max(PRINT_MIN_RADIUS),
            (preview.1 * PRINT_RATIO).max(PRINT_MIN_RADIUS),
        ),
    }
}

/// Compute marker radius and label size.
///
/// `area` is the drawing area in square surface units. A non-finite or
/// non-positive area is clamped onto the multiplier band rather than
/// producing NaN.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn marker_metrics(count: usize, area: f32, target: SizingTarget) -> MarkerMetrics {
    let radius = if count == 0 {
        match target {
            SizingTarget::Preview => DEFAULT_PREVIEW_RADIUS,
            SizingTarget::Print => DEFAULT_PRINT_RADIUS,
        }
    } else {
        let base = (COUNT_SCALE / (count as f32).sqrt()).clamp(MIN_BASE_RADIUS, MAX_BASE_RADIUS);
        let preview = base * area_factor(area);
        match target {
            SizingTarget::Preview => preview,
            SizingTarget::Print => (preview * PRINT_RATIO).max(PRINT_MIN_RADIUS),
        }
    };

    MarkerMetrics {
        radius,
        font_size: (radius * FONT_PER_RADIUS).max(MIN_FONT_SIZE),
    }
}

fn area_factor(area: f32) -> f32 {
    if !area.is_finite() {
        return 1.0;
    }
    (area.max(0.0) / REFERENCE_AREA)
        .sqrt()
        .clamp(MIN_AREA_FACTOR, MAX_AREA_FACTOR)
}

/// Cell and glyph size for a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    /// Edge length of one cell.
    pub cell_size: f32,
    /// Glyph size inside a cell.
    pub font_size: f32,
}

impl GridMetrics {
    /// Width of a grid with `cols` columns.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width(&self, cols: usize) -> f32 {
        self.cell_size * cols as f32
    }

    /// Height of a grid with `rows` rows.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self, rows: usize) -> f32 {
        self.cell_size * rows as f32
    }
}

/// Fit a `cols × rows` grid into `width × height`.
///
/// Returns `None` for a grid with no cells.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_metrics(cols: usize, rows: usize, width: f32, height: f32) -> Option<GridMetrics> {
    if cols == 0 || rows == 0 {
        return None;
    }
    let fit = (width / cols as f32).min(height / rows as f32);
    let cell_size = if fit.is_finite() {
        fit.clamp(MIN_CELL, MAX_CELL)
    } else {
        MIN_CELL
    };
    Some(GridMetrics {
        cell_size,
        font_size: (cell_size * GLYPH_PER_CELL).max(MIN_FONT_SIZE),
    })
}
