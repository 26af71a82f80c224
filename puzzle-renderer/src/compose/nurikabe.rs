//! Nurikabe pages: numbered puzzle grid, shaded solution grid.

use puzzle_core::NurikabePuzzle;

use super::{begin_section, ComposeContext, Numbering, Section};
use crate::backend::Surface;
use crate::error::RenderResult;
use crate::geometry::Point;
use crate::grid::{render_grid, GridMode, GridStyle};
use crate::sizing::grid_metrics;

/// Draw one section of a nurikabe, starting on a fresh page.
///
/// Returns `false` without drawing when the section's grid is empty.
///
/// # Errors
///
/// Returns an error if the surface rejects a draw call.
pub fn draw_section<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    puzzle: &NurikabePuzzle,
    section: Section,
    numbering: Numbering,
) -> RenderResult<bool> {
    let (grid, mode) = match section {
        Section::Puzzle => (&puzzle.puzzle, GridMode::Puzzle),
        Section::Solution => (&puzzle.solution, GridMode::Solution),
    };
    if grid.is_empty() {
        return Ok(false);
    }

    let frame = begin_section(surface, ctx, &section.heading(ctx.style, numbering))?;
    let content = frame.content;
    let Some(metrics) = grid_metrics(grid.cols(), grid.rows(), content.width, content.height)
    else {
        return Ok(false);
    };
    let origin = Point::new(
        content.x + (content.width - metrics.width(grid.cols())).max(0.0) / 2.0,
        content.y,
    );
    let mut style = GridStyle::new(mode, metrics, ctx.style.font_family.as_str());
    style.line_width = (metrics.cell_size * 0.04).max(1.0);
    render_grid(surface, grid, origin, &style)?;
    Ok(true)
}
