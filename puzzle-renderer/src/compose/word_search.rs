//! Word-search pages: grid plus sorted word list, solution with highlights.

use puzzle_core::WordSearchPuzzle;

use super::{begin_section, draw_title, ComposeContext, Numbering, Section};
use crate::backend::Surface;
use crate::error::RenderResult;
use crate::geometry::Point;
use crate::grid::{render_grid, GridMode, GridStyle};
use crate::pagination::{ColumnLayout, FlowController};
use crate::sizing::grid_metrics;

/// Share of the content height given to the grid when a word list follows.
const GRID_SHARE_WITH_LIST: f32 = 0.68;

/// Draw one section of a word search, starting on a fresh page.
///
/// Returns `false` without drawing when the grid is empty.
///
/// # Errors
///
/// Returns an error if the surface rejects a draw call.
pub fn draw_section<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    puzzle: &WordSearchPuzzle,
    section: Section,
    numbering: Numbering,
) -> RenderResult<bool> {
    let grid = &puzzle.grid;
    if grid.is_empty() {
        return Ok(false);
    }
    if let Err(e) = puzzle.validate() {
        tracing::warn!(
            "Word search {} has inconsistent placements: {e}",
            numbering.index
        );
    }

    let title = section.heading(ctx.style, numbering);
    let frame = begin_section(surface, ctx, &title)?;
    let content = frame.content;

    let words = puzzle.sorted_words();
    let with_list = section == Section::Puzzle && !words.is_empty();
    let grid_height = if with_list {
        content.height * GRID_SHARE_WITH_LIST
    } else {
        content.height
    };
    let Some(metrics) = grid_metrics(grid.cols(), grid.rows(), content.width, grid_height) else {
        return Ok(false);
    };

    let origin = Point::new(
        content.x + (content.width - metrics.width(grid.cols())).max(0.0) / 2.0,
        content.y,
    );
    let font = ctx.style.font_family.as_str();
    let style = match section {
        Section::Puzzle => GridStyle::new(GridMode::Puzzle, metrics, font),
        Section::Solution => {
            GridStyle::new(GridMode::Solution, metrics, font).with_highlights(&puzzle.placements)
        }
    };
    render_grid(surface, grid, origin, &style)?;

    if with_list {
        let list_top = origin.y + metrics.height(grid.rows()) + frame.body_size * 1.5;
        let columns = ColumnLayout::from_frame(&frame, ctx.layout.word_list_columns, frame.body_size);
        let rows = ColumnLayout::from_frame(&frame, 1, 0.0);
        let line_height = frame.body_size * ctx.layout.word_list_line_height;
        let body = ctx.body(&frame);
        let mut flow = FlowController::new(rows, surface.page_count() - 1).starting_at(list_top);
        let mut header = |s: &mut S| draw_title(s, ctx, &frame, &title);

        for row in words.chunks(columns.columns) {
            let placement = flow.flow(surface, line_height, &mut header)?;
            let baseline = placement.y + frame.body_size;
            for (col, word) in row.iter().enumerate() {
                surface.draw_text(word, Point::new(columns.column_x(col), baseline), &body)?;
            }
        }
        tracing::debug!(
            "Word list of {} words laid out in {} columns",
            words.len(),
            columns.columns
        );
    }
    Ok(true)
}
