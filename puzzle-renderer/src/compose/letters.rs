//! Letter slots: one blank per letter, words kept together on a row.

use crate::backend::{centered_baseline, Surface, TextAlign, TextStyle};
use crate::error::RenderResult;
use crate::geometry::{Color, Point};

/// One letter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    /// Letter written above the line (revealed or literal).
    pub shown: Option<char>,
    /// Small clue letter written below the line.
    pub clue: Option<char>,
    /// Whether the slot has an answer line.
    pub blank: bool,
}

impl Slot {
    /// A letter to be guessed.
    pub fn letter(shown: Option<char>, clue: Option<char>) -> Self {
        Self {
            shown,
            clue,
            blank: true,
        }
    }

    /// Punctuation and digits, printed as-is without a line.
    pub fn literal(c: char) -> Self {
        Self {
            shown: Some(c),
            clue: None,
            blank: false,
        }
    }
}

/// Slot geometry derived from the body text size.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotMetrics {
    pub width: f32,
    pub gap: f32,
    pub size: f32,
}

impl SlotMetrics {
    pub fn for_body(size: f32) -> Self {
        Self {
            width: size * 1.5,
            gap: size * 0.45,
            size,
        }
    }

    /// Height of one row including the clue line.
    pub fn row_height(&self, with_clues: bool) -> f32 {
        if with_clues {
            self.size * 3.4
        } else {
            self.size * 2.4
        }
    }

    /// Slots that fit in `width`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn per_row(&self, width: f32) -> usize {
        (((width + self.gap) / (self.width + self.gap)).floor().max(1.0)) as usize
    }

    #[allow(clippy::cast_precision_loss)]
    fn x(&self, index: usize) -> f32 {
        (self.width + self.gap) * index as f32
    }
}

/// Pack words into rows of at most `per_row` slots; `None` marks a space.
///
/// Words are kept whole unless a single word is longer than a row.
pub(crate) fn wrap_words(words: Vec<Vec<Slot>>, per_row: usize) -> Vec<Vec<Option<Slot>>> {
    let per_row = per_row.max(1);
    let mut rows = Vec::new();
    let mut row: Vec<Option<Slot>> = Vec::new();
    for word in words {
        if !row.is_empty() && row.len() + 1 + word.len() > per_row {
            rows.push(std::mem::take(&mut row));
        }
        if !row.is_empty() {
            row.push(None);
        }
        for slot in word {
            if row.len() == per_row {
                rows.push(std::mem::take(&mut row));
            }
            row.push(Some(slot));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Draw one row of slots with its top-left corner at `origin`.
pub(crate) fn draw_row<S: Surface + ?Sized>(
    surface: &mut S,
    origin: Point,
    row: &[Option<Slot>],
    metrics: SlotMetrics,
    font: &str,
) -> RenderResult<()> {
    let letter = TextStyle::new(font, metrics.size).aligned(TextAlign::Center);
    let clue = letter.clone().sized(metrics.size * 0.7).colored(Color::GREY);
    let line_y = metrics.size * 1.5;

    for (i, slot) in row.iter().enumerate() {
        let Some(slot) = slot else { continue };
        let left = origin.offset(Point::new(metrics.x(i), 0.0));
        let center_x = left.x + metrics.width / 2.0;
        if slot.blank {
            surface.draw_line(
                Point::new(left.x, left.y + line_y),
                Point::new(left.x + metrics.width, left.y + line_y),
                1.0,
                Color::BLACK,
            )?;
        }
        if let Some(c) = slot.shown {
            let baseline = centered_baseline(left.y + metrics.size * 0.8, metrics.size);
            surface.draw_text(&c.to_string(), Point::new(center_x, baseline), &letter)?;
        }
        if let Some(c) = slot.clue {
            let baseline = left.y + line_y + metrics.size * 1.1;
            surface.draw_text(&c.to_string(), Point::new(center_x, baseline), &clue)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(len: usize) -> Vec<Slot> {
        vec![Slot::letter(None, None); len]
    }

    #[test]
    fn test_words_stay_whole() {
        let rows = wrap_words(vec![word(3), word(4), word(2)], 8);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 8);
        assert_eq!(rows[1].len(), 2);
        assert!(rows[0][3].is_none());
    }

    #[test]
    fn test_long_word_is_broken() {
        let rows = wrap_words(vec![word(10)], 4);
        assert_eq!(rows.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 2]);
    }

    #[test]
    fn test_per_row_at_least_one() {
        let m = SlotMetrics::for_body(10.0);
        assert_eq!(m.per_row(1.0), 1);
        assert!(m.per_row(400.0) > 10);
    }
}
