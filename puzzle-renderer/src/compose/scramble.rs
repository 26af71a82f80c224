//! Scrambled-word sheets: numbered lines in two columns, overflowing onto
//! further pages.

use puzzle_core::ScrambledWord;

use super::{begin_section, draw_title, ComposeContext, Numbering, Section};
use crate::backend::{Surface, TextStyle};
use crate::error::RenderResult;
use crate::geometry::Point;
use crate::layout::{LayoutConfig, PageSize};
use crate::pagination::{ColumnLayout, FlowController};

const ANSWER_BLANK: &str = "________";
/// Furthest the answer column may start, as a share of the column width.
const ANSWER_COLUMN_CAP: f32 = 0.6;

/// Number of lines one column holds on a page of `page` size.
#[must_use]
pub fn lines_per_column(layout: &LayoutConfig, page: PageSize) -> usize {
    let frame = layout.frame(page);
    let columns = ColumnLayout::from_frame(&frame, layout.scramble_columns, frame.body_size);
    columns.capacity(frame.body_size * layout.scramble_line_height)
}

/// Number and scrambled word at the start of a line.
#[must_use]
pub fn clue_text(number: usize, entry: &ScrambledWord) -> String {
    format!("{number}. {}", entry.scrambled.trim().to_uppercase())
}

/// What goes in the answer column: a blank to fill, or the answer.
#[must_use]
pub fn answer_text(entry: &ScrambledWord, section: Section) -> String {
    match section {
        Section::Puzzle => ANSWER_BLANK.to_string(),
        Section::Solution => format!("= {}", entry.answer.trim().to_uppercase()),
    }
}

/// Offset of the answer column from the start of a line: one body size past
/// the widest clue, capped so the answer keeps most of the column.
fn answer_offset<S: Surface + ?Sized>(
    surface: &S,
    entries: &[ScrambledWord],
    body: &TextStyle,
    layout: &ColumnLayout,
) -> f32 {
    let widest = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| surface.measure_text(&clue_text(i + 1, entry), body))
        .fold(0.0, f32::max);
    (widest + body.size).min(layout.column_width * ANSWER_COLUMN_CAP)
}

/// Draw the puzzle section and then the solution section.
///
/// Returns the number of sections drawn (zero for an empty sheet).
///
/// # Errors
///
/// Returns an error if the surface rejects a draw call.
pub fn compose<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    entries: &[ScrambledWord],
) -> RenderResult<usize> {
    if entries.is_empty() {
        return Ok(0);
    }
    for section in [Section::Puzzle, Section::Solution] {
        draw_section(surface, ctx, entries, section)?;
    }
    Ok(2)
}

fn draw_section<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    entries: &[ScrambledWord],
    section: Section,
) -> RenderResult<()> {
    let title = section.heading(ctx.style, Numbering::single());
    let frame = begin_section(surface, ctx, &title)?;
    let layout = ColumnLayout::from_frame(&frame, ctx.layout.scramble_columns, frame.body_size);
    let line_height = frame.body_size * ctx.layout.scramble_line_height;
    let body = ctx.body(&frame);
    let answer_x = answer_offset(surface, entries, &body, &layout);

    let mut flow = FlowController::new(layout, surface.page_count() - 1);
    let mut header = |s: &mut S| draw_title(s, ctx, &frame, &title);
    for (i, entry) in entries.iter().enumerate() {
        let placement = flow.flow(surface, line_height, &mut header)?;
        let baseline = placement.y + frame.body_size;
        surface.draw_text(
            &clue_text(i + 1, entry),
            Point::new(placement.x, baseline),
            &body,
        )?;
        surface.draw_text(
            &answer_text(entry, section),
            Point::new(placement.x + answer_x, baseline),
            &body,
        )?;
    }
    tracing::debug!(
        "Scramble {} section: {} lines over {} pages",
        section.slug(),
        entries.len(),
        flow.cursor().page + 1
    );
    Ok(())
}
