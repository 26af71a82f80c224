//! Per-invocation style parameters supplied by the caller.

use serde::{Deserialize, Serialize};

/// Default typeface short name.
pub const DEFAULT_FONT: &str = "arial";

/// Immutable styling and naming choices for one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleParameters {
    /// Typeface short name (custom embedded font id or system font name).
    pub font_family: String,
    /// Auto-number sections ("Puzzle 1", "Solution 1") instead of custom titles.
    pub is_sequential: bool,
    /// Base name for saved files when not sequential.
    pub custom_name: Option<String>,
    /// Custom title for puzzle sections.
    pub puzzle_title: Option<String>,
    /// Custom title for solution sections.
    pub solution_title: Option<String>,
    /// Requested grid size.
    pub grid_size: usize,
    /// Number of puzzles to request from the generation service.
    ///
    /// Headings never read this: the service may return a different number,
    /// so composers number sections from the payload they draw.
    pub puzzle_count: usize,
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT.to_string(),
            is_sequential: true,
            custom_name: None,
            puzzle_title: None,
            solution_title: None,
            grid_size: 10,
            puzzle_count: 1,
        }
    }
}

impl StyleParameters {
    /// Heading for the puzzle section of the 1-based `index`-th of `total`
    /// puzzles.
    ///
    /// Custom titles carry a number only when there is more than one puzzle.
    #[must_use]
    pub fn puzzle_heading(&self, index: usize, total: usize) -> String {
        self.heading(self.puzzle_title.as_deref(), "Puzzle", index, total)
    }

    /// Heading for the solution section of the 1-based `index`-th of `total`
    /// puzzles.
    #[must_use]
    pub fn solution_heading(&self, index: usize, total: usize) -> String {
        self.heading(self.solution_title.as_deref(), "Solution", index, total)
    }

    /// Custom base name for saved files, when one applies.
    #[must_use]
    pub fn custom_file_base(&self) -> Option<&str> {
        if self.is_sequential {
            return None;
        }
        self.custom_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn heading(&self, custom: Option<&str>, fallback: &str, index: usize, total: usize) -> String {
        let custom = custom.map(str::trim).filter(|s| !s.is_empty());
        match (self.is_sequential, custom) {
            (false, Some(title)) if total > 1 => format!("{title} {index}"),
            (false, Some(title)) => title.to_string(),
            _ => format!("{fallback} {index}"),
        }
    }
}
