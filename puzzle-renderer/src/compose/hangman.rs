//! Hangman sheets: gallows, one blank per letter and an alphabet strip to
//! cross off; the solution writes the phrase into the blanks.

use puzzle_core::{Cell, HangmanPuzzle, PuzzleGrid};

use super::letters::{draw_row, wrap_words, Slot, SlotMetrics};
use super::{begin_section, draw_title, ComposeContext, Numbering, Section};
use crate::backend::Surface;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{Color, Point, Rect};
use crate::grid::{render_grid, GridMode, GridStyle};
use crate::layout::PageFrame;
use crate::pagination::{ColumnLayout, FlowController};
use crate::sizing::GridMetrics;

/// Letters per row of the alphabet strip.
const ALPHABET_COLUMNS: usize = 13;

/// Draw every puzzle section, then every solution section.
///
/// Puzzles with a blank phrase are skipped. Returns the number of sections
/// drawn.
///
/// # Errors
///
/// Returns an error if the surface rejects a draw call.
pub fn compose<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    puzzles: &[HangmanPuzzle],
) -> RenderResult<usize> {
    let playable: Vec<_> = puzzles
        .iter()
        .filter(|p| !p.phrase.trim().is_empty())
        .collect();
    let mut sections = 0;
    for section in [Section::Puzzle, Section::Solution] {
        for (i, puzzle) in playable.iter().enumerate() {
            let numbering = Numbering::new(i + 1, playable.len());
            draw_section(surface, ctx, puzzle, section, numbering)?;
            sections += 1;
        }
    }
    Ok(sections)
}

/// Slots for a phrase: letters get blanks, everything else is printed.
fn phrase_words(phrase: &str, reveal: bool) -> Vec<Vec<Slot>> {
    phrase
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| {
                    if c.is_alphabetic() {
                        let shown = reveal.then(|| c.to_uppercase().next().unwrap_or(c));
                        Slot::letter(shown, None)
                    } else {
                        Slot::literal(c)
                    }
                })
                .collect()
        })
        .collect()
}

fn alphabet() -> RenderResult<PuzzleGrid> {
    let letters: Vec<Cell> = ('A'..='Z').map(|c| Cell::glyph(c.to_string())).collect();
    PuzzleGrid::new(letters.chunks(ALPHABET_COLUMNS).map(<[Cell]>::to_vec).collect())
        .map_err(|e| RenderError::Resource(format!("alphabet grid: {e}")))
}

/// Gallows outline in the top-left of `area`.
fn draw_gallows<S: Surface + ?Sized>(surface: &mut S, area: Rect) -> RenderResult<()> {
    let w = area.height * 0.7;
    let stroke = (area.height * 0.02).max(1.5);
    let base_y = area.bottom();
    let post_x = area.x + w * 0.25;
    let beam_end = area.x + w;
    let lines = [
        (Point::new(area.x, base_y), Point::new(area.x + w * 0.75, base_y)),
        (Point::new(post_x, base_y), Point::new(post_x, area.y)),
        (Point::new(post_x, area.y), Point::new(beam_end, area.y)),
        (Point::new(beam_end, area.y), Point::new(beam_end, area.y + area.height * 0.15)),
    ];
    for (from, to) in lines {
        surface.draw_line(from, to, stroke, Color::BLACK)?;
    }
    Ok(())
}

fn draw_section<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    puzzle: &HangmanPuzzle,
    section: Section,
    numbering: Numbering,
) -> RenderResult<()> {
    let title = section.heading(ctx.style, numbering);
    let frame = begin_section(surface, ctx, &title)?;
    let content = frame.content;
    let body = ctx.body(&frame);
    let mut top = content.y;

    if let Some(category) = puzzle.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        for line in ctx.wrap_body(&format!("Category: {category}"), &frame) {
            surface.draw_text(&line, Point::new(content.x, top + frame.body_size), &body)?;
            top += frame.body_size * 1.4;
        }
        top += frame.body_size * 0.6;
    }

    let reveal = section == Section::Solution;
    if !reveal {
        let height = (content.height * 0.3).min(content.width * 0.5);
        let gallows = Rect::new(content.x, top, content.width, height);
        draw_gallows(surface, gallows)?;
        top = gallows.bottom() + frame.body_size * 2.0;
    }

    let slots = SlotMetrics::for_body(frame.body_size * 1.4);
    let rows = wrap_words(phrase_words(&puzzle.phrase, reveal), slots.per_row(content.width));
    let layout = ColumnLayout::from_frame(&frame, 1, 0.0);
    let mut flow = FlowController::new(layout, surface.page_count() - 1).starting_at(top);
    let mut header = |s: &mut S| draw_title(s, ctx, &frame, &title);
    let font = ctx.style.font_family.as_str();

    for row in &rows {
        let placement = flow.flow(surface, slots.row_height(false), &mut header)?;
        draw_row(surface, Point::new(placement.x, placement.y), row, slots, font)?;
    }

    if reveal {
        let phrase = puzzle.phrase.trim().to_uppercase();
        let line_height = frame.body_size * 1.5;
        for (i, line) in ctx.wrap_body(&format!("Answer: {phrase}"), &frame).iter().enumerate() {
            let lead = if i == 0 { frame.body_size * 0.5 } else { 0.0 };
            let placement = flow.flow(surface, line_height + lead, &mut header)?;
            surface.draw_text(
                line,
                Point::new(placement.x, placement.y + lead + frame.body_size * 1.2),
                &body,
            )?;
        }
    } else {
        draw_alphabet(surface, ctx, &frame, &mut flow, &mut header)?;
    }
    Ok(())
}

fn draw_alphabet<S, F>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    frame: &PageFrame,
    flow: &mut FlowController,
    header: &mut F,
) -> RenderResult<()>
where
    S: Surface + ?Sized,
    F: FnMut(&mut S) -> RenderResult<()>,
{
    let grid = alphabet()?;
    #[allow(clippy::cast_precision_loss)]
    let cell = (frame.content.width / ALPHABET_COLUMNS as f32).min(frame.body_size * 2.4);
    let metrics = GridMetrics {
        cell_size: cell,
        font_size: cell * 0.55,
    };
    let gap = frame.body_size;
    let placement = flow.flow(surface, metrics.height(grid.rows()) + gap, header)?;
    let origin = Point::new(
        frame.content.x + (frame.content.width - metrics.width(grid.cols())).max(0.0) / 2.0,
        placement.y + gap,
    );
    let style = GridStyle::new(GridMode::Puzzle, metrics, ctx.style.font_family.as_str());
    render_grid(surface, &grid, origin, &style)?;
    Ok(())
}
