//! # Puzzle Press Core
//!
//! Data model shared by the composer and the application: grids and cells,
//! word placements, dot-to-dot marker boards, style parameters, and the
//! payloads exchanged with the puzzle generation service.
//!
//! The composer treats everything here as read-only input. Only the
//! [`MarkerBoard`] is mutated, by the interactive editing surface, before
//! rendering starts.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod grid;
pub mod markers;
pub mod payload;
pub mod style;

pub use error::{PuzzleError, PuzzleResult};
pub use grid::{Cell, CellKind, GridCoord, PuzzleGrid, WordPlacement};
pub use markers::{MarkerBoard, MarkerId, MarkerPoint};
pub use payload::{
    CryptogramPuzzle, Difficulty, DotToDotPuzzle, GenerationRequest, HangmanPuzzle,
    NurikabePuzzle, OutputMode, PuzzleKind, PuzzlePayload, ScrambledWord, WordSearchPuzzle,
};
pub use style::{StyleParameters, DEFAULT_FONT};

/// Puzzle core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
