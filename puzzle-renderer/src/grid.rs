//! Cell grid rendering.
//!
//! Draw order is fixed: solution fills, then glyphs, then highlight
//! outlines, then cell borders last so they stay visible over any fill.
//! Every position is computed 0-based and translated onto the page through
//! the grid origin.

use std::collections::BTreeSet;

use puzzle_core::{CellKind, GridCoord, PuzzleGrid, WordPlacement};

use crate::backend::{centered_baseline, Surface, TextAlign, TextStyle};
use crate::error::RenderResult;
use crate::geometry::{Color, Point, Rect};
use crate::sizing::GridMetrics;

/// Highlight inset as a fraction of the cell size.
pub const HIGHLIGHT_INSET: f32 = 0.12;
/// Highlight stroke width as a fraction of the cell size.
pub const HIGHLIGHT_STROKE: f32 = 0.06;
/// Thinnest visible highlight stroke.
pub const MIN_HIGHLIGHT_STROKE: f32 = 1.0;

/// Which rendering of the grid to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    /// Glyphs only where a cell has meaningful content.
    Puzzle,
    /// Cell backgrounds filled by marker; glyphs on unfilled cells.
    Solution,
}

/// How to render a grid.
#[derive(Debug, Clone)]
pub struct GridStyle<'a> {
    /// Puzzle or solution rendering.
    pub mode: GridMode,
    /// Cell and glyph size.
    pub metrics: GridMetrics,
    /// Font for cell glyphs.
    pub font: &'a str,
    /// Word paths to outline, if highlighting is enabled.
    pub highlights: Option<&'a [WordPlacement]>,
    /// Border stroke width.
    pub line_width: f32,
    /// Border color.
    pub line_color: Color,
    /// Highlight outline color.
    pub highlight_color: Color,
}

impl<'a> GridStyle<'a> {
    /// Default style for a mode.
    #[must_use]
    pub fn new(mode: GridMode, metrics: GridMetrics, font: &'a str) -> Self {
        Self {
            mode,
            metrics,
            font,
            highlights: None,
            line_width: 1.0,
            line_color: Color::BLACK,
            highlight_color: Color::HIGHLIGHT,
        }
    }

    /// Outline these word paths.
    #[must_use]
    pub fn with_highlights(mut self, placements: &'a [WordPlacement]) -> Self {
        self.highlights = Some(placements);
        self
    }
}

/// Counts of what was drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridStats {
    /// Horizontal boundary lines.
    pub horizontal_lines: usize,
    /// Vertical boundary lines.
    pub vertical_lines: usize,
    /// Cell glyphs.
    pub glyphs: usize,
    /// Filled cell backgrounds.
    pub fills: usize,
    /// Highlight outlines.
    pub highlights: usize,
}

/// Rectangle of a cell, relative to the grid origin.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cell_rect(coord: GridCoord, cell_size: f32) -> Rect {
    Rect::new(
        coord.col as f32 * cell_size,
        coord.row as f32 * cell_size,
        cell_size,
        cell_size,
    )
}

/// Distinct in-bounds coordinates on any word path, in row-major order.
#[must_use]
pub fn highlight_cells(grid: &PuzzleGrid, placements: &[WordPlacement]) -> BTreeSet<GridCoord> {
    let mut cells = BTreeSet::new();
    for placement in placements {
        for coord in &placement.path {
            if grid.contains(*coord) {
                cells.insert(*coord);
            } else {
                tracing::warn!(
                    "Highlight for '{}' at {coord} lies outside the {}x{} grid",
                    placement.word,
                    grid.rows(),
                    grid.cols()
                );
            }
        }
    }
    cells
}

/// Draw a grid with its top-left corner at `origin`.
///
/// An empty grid draws nothing and reports empty stats.
///
/// # Errors
///
/// Returns an error if the surface rejects a draw call.
#[allow(clippy::cast_precision_loss)]
pub fn render_grid<S: Surface + ?Sized>(
    surface: &mut S,
    grid: &PuzzleGrid,
    origin: Point,
    style: &GridStyle<'_>,
) -> RenderResult<GridStats> {
    let mut stats = GridStats::default();
    if grid.is_empty() {
        tracing::debug!("Empty grid, nothing to render");
        return Ok(stats);
    }

    let cell = style.metrics.cell_size;
    let glyph_style = TextStyle::new(style.font, style.metrics.font_size).aligned(TextAlign::Center);

    if style.mode == GridMode::Solution {
        for (coord, c) in grid.cells() {
            let fill = match c.kind {
                CellKind::Shaded => Color::BLACK,
                CellKind::Blank => Color::WHITE,
                CellKind::Glyph => continue,
            };
            surface.fill_rect(Rect::at(origin, cell_rect(coord, cell)), fill)?;
            stats.fills += 1;
        }
    }

    for (coord, c) in grid.cells() {
        let draw = match style.mode {
            GridMode::Puzzle => c.has_content(),
            GridMode::Solution => c.has_content() && !c.is_filled_block(),
        };
        if !draw {
            continue;
        }
        let center = Rect::at(origin, cell_rect(coord, cell)).center();
        let at = Point::new(center.x, centered_baseline(center.y, glyph_style.size));
        surface.draw_text(c.value.trim(), at, &glyph_style)?;
        stats.glyphs += 1;
    }

    if let Some(placements) = style.highlights {
        let stroke = (cell * HIGHLIGHT_STROKE).max(MIN_HIGHLIGHT_STROKE);
        for coord in highlight_cells(grid, placements) {
            let rect = Rect::at(origin, cell_rect(coord, cell)).inset(cell * HIGHLIGHT_INSET);
            surface.stroke_rect(rect, stroke, style.highlight_color)?;
            stats.highlights += 1;
        }
    }

    let width = style.metrics.width(grid.cols());
    let height = style.metrics.height(grid.rows());
    for row in 0..=grid.rows() {
        let y = row as f32 * cell;
        surface.draw_line(
            origin.offset(Point::new(0.0, y)),
            origin.offset(Point::new(width, y)),
            style.line_width,
            style.line_color,
        )?;
        stats.horizontal_lines += 1;
    }
    for col in 0..=grid.cols() {
        let x = col as f32 * cell;
        surface.draw_line(
            origin.offset(Point::new(x, 0.0)),
            origin.offset(Point::new(x, height)),
            style.line_width,
            style.line_color,
        )?;
        stats.vertical_lines += 1;
    }

    tracing::trace!(
        "Grid {}x{} drawn: {} glyphs, {} fills, {} highlights",
        grid.rows(),
        grid.cols(),
        stats.glyphs,
        stats.fills,
        stats.highlights
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use puzzle_core::Cell;

    use super::*;
    use crate::backend::recording::{DrawOp, RecordingSurface};
    use crate::layout::PageSize;

    fn metrics(cell: f32) -> GridMetrics {
        GridMetrics {
            cell_size: cell,
            font_size: cell * 0.6,
        }
    }

    fn surface() -> RecordingSurface {
        let mut s = RecordingSurface::new(PageSize::A4);
        s.begin_page().unwrap();
        s
    }

    #[test]
    fn test_borders_are_drawn_last() {
        let grid = PuzzleGrid::from_lines(&["AB", "#C"]).unwrap();
        let mut s = surface();
        let style = GridStyle::new(GridMode::Solution, metrics(20.0), "arial");
        render_grid(&mut s, &grid, Point::new(0.0, 0.0), &style).unwrap();

        let ops = &s.pages()[0];
        let first_line = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Line { .. }))
            .unwrap();
        assert!(ops[first_line..]
            .iter()
            .all(|op| matches!(op, DrawOp::Line { .. })));
    }

    #[test]
    fn test_solution_fills_by_marker() {
        let grid = PuzzleGrid::new(vec![
            vec![Cell::shaded(), Cell::blank()],
            vec![Cell::glyph("3"), Cell::shaded()],
        ])
        .unwrap();
        let mut s = surface();
        let style = GridStyle::new(GridMode::Solution, metrics(10.0), "arial");
        let stats = render_grid(&mut s, &grid, Point::new(5.0, 5.0), &style).unwrap();

        assert_eq!(stats.fills, 3);
        assert_eq!(stats.glyphs, 1);
        let black = s
            .ops()
            .filter(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == Color::BLACK))
            .count();
        assert_eq!(black, 2);
    }

    #[test]
    fn test_origin_translation() {
        let grid = PuzzleGrid::from_lines(&["A"]).unwrap();
        let mut s = surface();
        let style = GridStyle::new(GridMode::Puzzle, metrics(10.0), "arial");
        render_grid(&mut s, &grid, Point::new(100.0, 200.0), &style).unwrap();

        let text_at = s
            .ops()
            .find_map(|op| match op {
                DrawOp::Text { at, .. } => Some(*at),
                _ => None,
            })
            .unwrap();
        assert!((text_at.x - 105.0).abs() < 1e-4);
    }

    #[test]
    fn test_shared_cell_highlighted_once() {
        let grid = PuzzleGrid::from_lines(&["CAT", "XAX", "XRX"]).unwrap();
        let placements = vec![
            WordPlacement::new(
                "CAT",
                vec![GridCoord::new(0, 0), GridCoord::new(0, 1), GridCoord::new(0, 2)],
            ),
            WordPlacement::new(
                "AAR",
                vec![GridCoord::new(0, 1), GridCoord::new(1, 1), GridCoord::new(2, 1)],
            ),
        ];
        let mut s = surface();
        let style =
            GridStyle::new(GridMode::Solution, metrics(20.0), "arial").with_highlights(&placements);
        let stats = render_grid(&mut s, &grid, Point::default(), &style).unwrap();

        assert_eq!(stats.highlights, 5);
        let outlines = s
            .ops()
            .filter(|op| matches!(op, DrawOp::StrokeRect { .. }))
            .count();
        assert_eq!(outlines, 5);
    }

    #[test]
    fn test_out_of_bounds_highlight_skipped() {
        let grid = PuzzleGrid::from_lines(&["AB"]).unwrap();
        let placements = vec![WordPlacement::new("ZZ", vec![GridCoord::new(0, 1), GridCoord::new(4, 4)])];
        assert_eq!(highlight_cells(&grid, &placements).len(), 1);
    }

    #[test]
    fn test_highlight_stroke_has_floor() {
        let grid = PuzzleGrid::from_lines(&["A"]).unwrap();
        let placements = vec![WordPlacement::new("A", vec![GridCoord::new(0, 0)])];
        let mut s = surface();
        let style =
            GridStyle::new(GridMode::Solution, metrics(12.0), "arial").with_highlights(&placements);
        render_grid(&mut s, &grid, Point::default(), &style).unwrap();
        let width = s
            .ops()
            .find_map(|op| match op {
                DrawOp::StrokeRect { width, .. } => Some(*width),
                _ => None,
            })
            .unwrap();
        assert!((width - MIN_HIGHLIGHT_STROKE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_grid_draws_nothing() {
        let grid = PuzzleGrid::new(Vec::new()).unwrap();
        let mut s = surface();
        let style = GridStyle::new(GridMode::Puzzle, metrics(10.0), "arial");
        let stats = render_grid(&mut s, &grid, Point::default(), &style).unwrap();
        assert_eq!(stats, GridStats::default());
        assert!(s.pages()[0].is_empty());
    }

    fn grid_strategy() -> impl Strategy<Value = (usize, Vec<bool>)> {
        (1usize..12).prop_flat_map(|g| (Just(g), prop::collection::vec(any::<bool>(), g * g)))
    }

    proptest! {
        #[test]
        fn prop_line_and_glyph_counts((g, filled) in grid_strategy(), solution in any::<bool>()) {
            let rows = filled
                .chunks(g)
                .map(|row| row.iter().map(|f| if *f { Cell::glyph("Q") } else { Cell::blank() }).collect())
                .collect();
            let grid = PuzzleGrid::new(rows).unwrap();
            let mode = if solution { GridMode::Solution } else { GridMode::Puzzle };
            let mut s = surface();
            let stats = render_grid(&mut s, &grid, Point::new(3.0, 7.0), &GridStyle::new(mode, metrics(15.0), "arial")).unwrap();

            prop_assert_eq!(stats.horizontal_lines, g + 1);
            prop_assert_eq!(stats.vertical_lines, g + 1);
            prop_assert_eq!(stats.glyphs, filled.iter().filter(|f| **f).count());
            prop_assert!(stats.glyphs <= g * g);
        }

        #[test]
        fn prop_each_coordinate_outlined_once(
            paths in prop::collection::vec(prop::collection::vec((0usize..6, 0usize..6), 1..8), 1..6)
        ) {
            let grid = PuzzleGrid::from_lines(&["ABCDEF"; 6]).unwrap();
            let placements: Vec<_> = paths
                .iter()
                .map(|p| WordPlacement::new("W", p.iter().map(|(r, c)| GridCoord::new(*r, *c)).collect()))
                .collect();
            let distinct: BTreeSet<_> = paths.iter().flatten().collect();
            let mut s = surface();
            let style = GridStyle::new(GridMode::Solution, metrics(20.0), "arial").with_highlights(&placements);
            let stats = render_grid(&mut s, &grid, Point::default(), &style).unwrap();
            prop_assert_eq!(stats.highlights, distinct.len());
        }
    }
}
