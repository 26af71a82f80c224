//! # Puzzle Press
//!
//! Workbench around the puzzle renderer: fetches puzzle data from the
//! generation service (or a captured file), composes it once fonts are
//! ready, and saves or opens the result.
//!
//! Only one generation runs at a time; see [`gate::LoadingGate`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod emit;
pub mod error;
pub mod gate;
pub mod source;
pub mod workbench;

pub use config::{CliArgs, PressConfig};
pub use emit::{ArtifactSink, Emitter, FileSystemSink, Notifier, TracingNotifier};
pub use error::{PressError, PressResult};
pub use gate::{LoadingGate, LoadingGuard};
pub use source::{FilePuzzleSource, HttpPuzzleSource, PuzzleSource};
pub use workbench::{Outcome, Workbench};

/// Puzzle Press version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
