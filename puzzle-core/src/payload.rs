//! Puzzle payloads returned by the generation service, and the request sent to it.
//!
//! | Kind           | Payload                     | Output          |
//! |----------------|-----------------------------|-----------------|
//! | `word_search`  | grid + words + placements   | raster images   |
//! | `nurikabe`     | puzzle grid + solution grid | raster images   |
//! | `hangman`      | phrase + category           | document        |
//! | `cryptogram`   | cipher text + plain text    | document        |
//! | `word_scramble`| scrambled/answer pairs      | document        |
//! | `dot_to_dot`   | marker board                | document        |

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MarkerBoard, PuzzleError, PuzzleGrid, PuzzleResult, WordPlacement};

/// The kinds of puzzle the composer knows how to lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    /// Letter grid with hidden words.
    WordSearch,
    /// Shaded-island logic grid.
    Nurikabe,
    /// Guess-the-phrase sheets.
    Hangman,
    /// Substitution-cipher phrases.
    Cryptogram,
    /// Unscramble-the-word lists.
    WordScramble,
    /// Numbered dots joined in order.
    DotToDot,
}

/// How a puzzle kind is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One multi-page vector document.
    Document,
    /// One raster image per page.
    RasterImages,
}

impl PuzzleKind {
    /// Output mode used for this kind.
    #[must_use]
    pub fn output_mode(self) -> OutputMode {
        match self {
            Self::WordSearch | Self::Nurikabe => OutputMode::RasterImages,
            Self::Hangman | Self::Cryptogram | Self::WordScramble | Self::DotToDot => {
                OutputMode::Document
            }
        }
    }

    /// Short slug used for default file names.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::WordSearch => "wordsearch",
            Self::Nurikabe => "nurikabe",
            Self::Hangman => "hangman",
            Self::Cryptogram => "cryptogram",
            Self::WordScramble => "wordscramble",
            Self::DotToDot => "dot-to-dot",
        }
    }
}

impl std::fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PuzzleKind {
    type Err = PuzzleError;

    /// Accepts the slug or the wire name, ignoring case and `-`/`_`.
    fn from_str(s: &str) -> PuzzleResult<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "wordsearch" => Ok(Self::WordSearch),
            "nurikabe" => Ok(Self::Nurikabe),
            "hangman" => Ok(Self::Hangman),
            "cryptogram" => Ok(Self::Cryptogram),
            "wordscramble" | "scramble" => Ok(Self::WordScramble),
            "dottodot" => Ok(Self::DotToDot),
            _ => Err(PuzzleError::UnknownValue {
                what: "puzzle kind",
                value: s.to_string(),
            }),
        }
    }
}

/// One word-search puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSearchPuzzle {
    /// Letter grid.
    pub grid: PuzzleGrid,
    /// Words to find.
    pub words: Vec<String>,
    /// Where each word sits in the grid.
    #[serde(default)]
    pub placements: Vec<WordPlacement>,
}

impl WordSearchPuzzle {
    /// Check every placement lies inside the grid.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-bounds placement.
    pub fn validate(&self) -> PuzzleResult<()> {
        self.placements
            .iter()
            .try_for_each(|p| p.validate_within(&self.grid))
    }

    /// Words sorted for the printed word list (upper-cased, lexicographic).
    #[must_use]
    pub fn sorted_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .words
            .iter()
            .map(|w| w.trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.sort();
        words
    }
}

/// One nurikabe puzzle with its solved grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurikabePuzzle {
    /// Clue grid (numbers on blank cells).
    pub puzzle: PuzzleGrid,
    /// Solved grid (shaded sea, blank islands).
    pub solution: PuzzleGrid,
}

/// One hangman phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HangmanPuzzle {
    /// Phrase to guess.
    pub phrase: String,
    /// Optional category hint.
    #[serde(default)]
    pub category: Option<String>,
}

/// One cryptogram phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptogramPuzzle {
    /// Enciphered text shown to the solver.
    pub cipher_text: String,
    /// Plain text answer, character-aligned with `cipher_text`.
    pub plain_text: String,
    /// Pre-revealed cipher → plain letters.
    #[serde(default)]
    pub hints: BTreeMap<char, char>,
}

impl CryptogramPuzzle {
    /// Plain letter for a cipher letter, from the aligned texts or the hints.
    #[must_use]
    pub fn decode(&self, cipher: char) -> Option<char> {
        let cipher = cipher.to_ascii_uppercase();
        self.hints
            .iter()
            .find(|(c, _)| c.to_ascii_uppercase() == cipher)
            .map(|(_, p)| p.to_ascii_uppercase())
            .or_else(|| {
                self.cipher_text
                    .chars()
                    .zip(self.plain_text.chars())
                    .find(|(c, _)| c.to_ascii_uppercase() == cipher)
                    .map(|(_, p)| p.to_ascii_uppercase())
            })
    }

    /// Hint letter revealed for a cipher letter.
    #[must_use]
    pub fn hint(&self, cipher: char) -> Option<char> {
        let cipher = cipher.to_ascii_uppercase();
        self.hints
            .iter()
            .find(|(c, _)| c.to_ascii_uppercase() == cipher)
            .map(|(_, p)| p.to_ascii_uppercase())
    }
}

/// One scrambled word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrambledWord {
    /// Letters as shown to the solver.
    pub scrambled: String,
    /// The unscrambled word.
    pub answer: String,
}

/// One dot-to-dot picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotToDotPuzzle {
    /// The board the markers were placed on.
    pub board: MarkerBoard,
}

impl DotToDotPuzzle {
    /// Generation is only possible once at least one marker exists.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        !self.board.is_empty()
    }
}

/// Structured puzzle data as returned by the generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PuzzlePayload {
    /// Word-search puzzles.
    WordSearch {
        /// Puzzles in output order.
        puzzles: Vec<WordSearchPuzzle>,
    },
    /// Nurikabe puzzles.
    Nurikabe {
        /// Puzzles in output order.
        puzzles: Vec<NurikabePuzzle>,
    },
    /// Hangman sheets.
    Hangman {
        /// Puzzles in output order.
        puzzles: Vec<HangmanPuzzle>,
    },
    /// Cryptograms.
    Cryptogram {
        /// Puzzles in output order.
        puzzles: Vec<CryptogramPuzzle>,
    },
    /// A scrambled-word sheet.
    WordScramble {
        /// Entries in output order.
        entries: Vec<ScrambledWord>,
    },
    /// A dot-to-dot picture.
    DotToDot(DotToDotPuzzle),
}

impl PuzzlePayload {
    /// Kind of puzzle carried.
    #[must_use]
    pub fn kind(&self) -> PuzzleKind {
        match self {
            Self::WordSearch { .. } => PuzzleKind::WordSearch,
            Self::Nurikabe { .. } => PuzzleKind::Nurikabe,
            Self::Hangman { .. } => PuzzleKind::Hangman,
            Self::Cryptogram { .. } => PuzzleKind::Cryptogram,
            Self::WordScramble { .. } => PuzzleKind::WordScramble,
            Self::DotToDot(_) => PuzzleKind::DotToDot,
        }
    }

    /// Whether there is anything to render at all.
    ///
    /// This is the predicate the generate action is enabled by.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        match self {
            Self::WordSearch { puzzles } => puzzles.iter().any(|p| !p.grid.is_empty()),
            Self::Nurikabe { puzzles } => puzzles.iter().any(|p| !p.puzzle.is_empty()),
            Self::Hangman { puzzles } => puzzles.iter().any(|p| !p.phrase.trim().is_empty()),
            Self::Cryptogram { puzzles } => {
                puzzles.iter().any(|p| !p.cipher_text.trim().is_empty())
            }
            Self::WordScramble { entries } => !entries.is_empty(),
            Self::DotToDot(puzzle) => puzzle.can_generate(),
        }
    }

    /// Parse a payload from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a payload.
    pub fn from_json(json: &str) -> PuzzleResult<Self> {
        serde_json::from_str(json).map_err(PuzzleError::Serialization)
    }

    /// Serialize the payload to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> PuzzleResult<String> {
        serde_json::to_string(self).map_err(PuzzleError::Serialization)
    }
}

/// Difficulty requested from the generation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Forward/down placements only.
    Easy,
    /// Adds diagonals.
    #[default]
    Medium,
    /// Adds reversed words.
    Hard,
}

impl FromStr for Difficulty {
    type Err = PuzzleError;

    fn from_str(s: &str) -> PuzzleResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(PuzzleError::UnknownValue {
                what: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

/// Request sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Kind of puzzle wanted.
    pub kind: PuzzleKind,
    /// Source words or phrases.
    #[serde(default)]
    pub words: Vec<String>,
    /// Grid edge length, for grid puzzles.
    pub grid_size: usize,
    /// Number of puzzles to generate.
    pub puzzle_count: usize,
    /// Difficulty.
    #[serde(default)]
    pub difficulty: Difficulty,
}
