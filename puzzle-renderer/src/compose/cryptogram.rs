//! Cryptogram sheets: cipher letters under answer blanks, hint letters
//! pre-filled; the solution fills every blank with the decoded letter.

use puzzle_core::CryptogramPuzzle;

use super::letters::{draw_row, wrap_words, Slot, SlotMetrics};
use super::{begin_section, draw_title, ComposeContext, Numbering, Section};
use crate::backend::Surface;
use crate::error::RenderResult;
use crate::geometry::Point;
use crate::pagination::{ColumnLayout, FlowController};

/// Draw every puzzle section, then every solution section.
///
/// Puzzles with blank cipher text are skipped. Returns the number of
/// sections drawn.
///
/// # Errors
///
/// Returns an error if the surface rejects a draw call.
pub fn compose<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    puzzles: &[CryptogramPuzzle],
) -> RenderResult<usize> {
    let playable: Vec<_> = puzzles
        .iter()
        .filter(|p| !p.cipher_text.trim().is_empty())
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

fn cipher_words(puzzle: &CryptogramPuzzle, section: Section) -> Vec<Vec<Slot>> {
    puzzle
        .cipher_text
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| {
                    if !c.is_ascii_alphabetic() {
                        return Slot::literal(c);
                    }
                    let cipher = c.to_ascii_uppercase();
                    let shown = match section {
                        Section::Puzzle => puzzle.hint(cipher),
                        Section::Solution => puzzle.decode(cipher),
                    };
                    Slot::letter(shown, Some(cipher))
                })
                .collect()
        })
        .collect()
}

fn draw_section<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ComposeContext<'_>,
    puzzle: &CryptogramPuzzle,
    section: Section,
    numbering: Numbering,
) -> RenderResult<()> {
    let title = section.heading(ctx.style, numbering);
    let frame = begin_section(surface, ctx, &title)?;
    let slots = SlotMetrics::for_body(frame.body_size * 1.2);
    let rows = wrap_words(
        cipher_words(puzzle, section),
        slots.per_row(frame.content.width),
    );

    let mut flow = FlowController::new(
        ColumnLayout::from_frame(&frame, 1, 0.0),
        surface.page_count() - 1,
    );
    let mut header = |s: &mut S| draw_title(s, ctx, &frame, &title);
    let font = ctx.style.font_family.as_str();
    for row in &rows {
        let placement = flow.flow(surface, slots.row_height(true), &mut header)?;
        draw_row(surface, Point::new(placement.x, placement.y), row, slots, font)?;
    }

    if section == Section::Solution && !puzzle.plain_text.trim().is_empty() {
        let placement = flow.flow(surface, frame.body_size * 2.5, &mut header)?;
        surface.draw_text(
            puzzle.plain_text.trim(),
            Point::new(placement.x, placement.y + frame.body_size * 1.5),
            &ctx.body(&frame),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use puzzle_core::StyleParameters;

    use super::*;
    use crate::backend::recording::RecordingSurface;
    use crate::compose::test_support;
    use crate::layout::LayoutConfig;

    fn puzzle() -> CryptogramPuzzle {
        CryptogramPuzzle {
            cipher_text: "XBU ZDH!".to_string(),
            plain_text: "THE DOG!".to_string(),
            hints: BTreeMap::from([('B', 'H')]),
        }
    }

    #[test]
    fn test_hints_prefilled_in_puzzle() {
        let words = cipher_words(&puzzle(), Section::Puzzle);
        assert_eq!(words[0][0], Slot::letter(None, Some('X')));
        assert_eq!(words[0][1], Slot::letter(Some('H'), Some('B')));
        assert_eq!(words[1][3], Slot::literal('!'));
    }

    #[test]
    fn test_solution_decodes_every_letter() {
        let words = cipher_words(&puzzle(), Section::Solution);
        let decoded: String = words[1]
            .iter()
            .filter_map(|slot| slot.shown)
            .collect();
        assert_eq!(decoded, "DOG!");
    }

    #[tokio::test]
    async fn test_sections_in_order() {
        let fonts = test_support::fonts(&["courier"]).await;
        let style = StyleParameters {
            font_family: "courier".to_string(),
            ..StyleParameters::default()
        };
        let layout = LayoutConfig::default();
        let ctx = ComposeContext::new(&style, &fonts, &layout);
        let mut surface = RecordingSurface::new(layout.document_page);

        assert_eq!(compose(&mut surface, &ctx, &[puzzle()]).unwrap(), 2);
        assert_eq!(surface.texts_on(0)[0], "Puzzle 1");
        assert_eq!(surface.texts_on(1)[0], "Solution 1");
        assert!(surface.texts_on(1).contains(&"THE DOG!"));
    }
}
