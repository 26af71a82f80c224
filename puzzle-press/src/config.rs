//! Command-line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use puzzle_core::{Difficulty, GenerationRequest, PuzzleKind, StyleParameters, DEFAULT_FONT};
use puzzle_renderer::fonts::{DirectoryFontSource, FontSource, MemoryFontSource};
use puzzle_renderer::{FontProvisioner, FontRegistry, LayoutConfig, PuzzleComposer};

use crate::emit::{Emitter, FileSystemSink, TracingNotifier};
use crate::error::{PressError, PressResult};
use crate::source::{FilePuzzleSource, HttpPuzzleSource, PuzzleSource};
use crate::workbench::Workbench;

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "puzzle-press",
    version,
    about = "Turn generated puzzles into printable documents and images"
)]
pub struct CliArgs {
    /// JSON payload captured from the generation service.
    #[arg(long, env = "PUZZLE_INPUT", conflicts_with = "service_url")]
    pub input: Option<PathBuf>,

    /// Generation service endpoint.
    #[arg(long, env = "PUZZLE_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Puzzle kind to request.
    #[arg(long, default_value = "word_search")]
    pub kind: PuzzleKind,

    /// Source words or phrases, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub words: Vec<String>,

    /// Grid edge length for grid puzzles.
    #[arg(long, default_value_t = 10)]
    pub grid_size: usize,

    /// Number of puzzles to request.
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Difficulty to request.
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Typeface short name.
    #[arg(long, env = "PUZZLE_FONT", default_value = DEFAULT_FONT)]
    pub font: String,

    /// Auto-number sections and files instead of using custom names.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sequential: bool,

    /// Base name for saved files when not sequential.
    #[arg(long)]
    pub name: Option<String>,

    /// Title for puzzle sections when not sequential.
    #[arg(long)]
    pub puzzle_title: Option<String>,

    /// Title for solution sections when not sequential.
    #[arg(long)]
    pub solution_title: Option<String>,

    /// Directory raster images are saved to.
    #[arg(long, env = "PUZZLE_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Directory holding embedded font data (`<id>.ttf`).
    #[arg(long, env = "PUZZLE_FONT_DIR")]
    pub font_dir: Option<PathBuf>,

    /// Command used to open documents.
    #[arg(long, env = "PUZZLE_VIEWER")]
    pub viewer: Option<String>,

    /// Also save each raster page as SVG.
    #[arg(long)]
    pub keep_svg: bool,

    /// Save the dot-to-dot marker preview instead of the printable pages.
    #[arg(long)]
    pub preview: bool,
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct PressConfig {
    /// Captured payload file.
    pub input: Option<PathBuf>,
    /// Generation service endpoint.
    pub service_url: Option<String>,
    /// Request sent to the source.
    pub request: GenerationRequest,
    /// Style parameters for composition.
    pub style: StyleParameters,
    /// Raster output directory.
    pub out_dir: PathBuf,
    /// Embedded font directory.
    pub font_dir: Option<PathBuf>,
    /// Document viewer command.
    pub viewer: Option<String>,
    /// Save SVG alongside PNG.
    pub keep_svg: bool,
    /// Save the marker preview only.
    pub preview: bool,
    /// Page layout tunables.
    pub layout: LayoutConfig,
}

impl Default for PressConfig {
    fn default() -> Self {
        let style = StyleParameters::default();
        Self {
            input: None,
            service_url: None,
            request: GenerationRequest {
                kind: PuzzleKind::WordSearch,
                words: Vec::new(),
                grid_size: style.grid_size,
                puzzle_count: style.puzzle_count,
                difficulty: Difficulty::default(),
            },
            style,
            out_dir: PathBuf::from("."),
            font_dir: None,
            viewer: None,
            keep_svg: false,
            preview: false,
            layout: LayoutConfig::default(),
        }
    }
}

impl From<CliArgs> for PressConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            input: args.input,
            service_url: args.service_url,
            request: GenerationRequest {
                kind: args.kind,
                words: args
                    .words
                    .into_iter()
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect(),
                grid_size: args.grid_size,
                puzzle_count: args.count,
                difficulty: args.difficulty,
            },
            style: StyleParameters {
                font_family: args.font,
                is_sequential: args.sequential,
                custom_name: args.name,
                puzzle_title: args.puzzle_title,
                solution_title: args.solution_title,
                grid_size: args.grid_size,
                puzzle_count: args.count,
            },
            out_dir: args.out_dir,
            font_dir: args.font_dir,
            viewer: args.viewer,
            keep_svg: args.keep_svg,
            preview: args.preview,
            layout: LayoutConfig::default(),
        }
    }
}

impl PressConfig {
    /// The configured puzzle source; a captured file wins over the service.
    ///
    /// # Errors
    ///
    /// Returns [`PressError::Config`] if neither is configured, or the
    /// service client cannot be built.
    pub fn source(&self) -> PressResult<Arc<dyn PuzzleSource>> {
        match (&self.input, &self.service_url) {
            (Some(path), _) => Ok(Arc::new(FilePuzzleSource::new(path))),
            (None, Some(url)) => Ok(Arc::new(HttpPuzzleSource::new(url)?)),
            (None, None) => Err(PressError::Config(
                "either --input or --service-url is required".to_string(),
            )),
        }
    }

    /// Font data source: the font directory, or nothing embedded.
    #[must_use]
    pub fn font_source(&self) -> Arc<dyn FontSource> {
        match &self.font_dir {
            Some(dir) => Arc::new(DirectoryFontSource::new(dir)),
            None => Arc::new(MemoryFontSource::new()),
        }
    }

    /// Assemble a workbench writing to the file system.
    ///
    /// # Errors
    ///
    /// Returns an error if the puzzle source cannot be built.
    pub fn workbench(&self) -> PressResult<Workbench> {
        let composer = PuzzleComposer::new(
            FontProvisioner::new(self.font_source(), FontRegistry::new()),
            self.layout.clone(),
        );
        let sink = FileSystemSink::new(&self.out_dir).with_viewer(self.viewer.clone());
        Ok(Workbench::new(
            self.source()?,
            composer,
            Emitter::new(Arc::new(sink)).keep_svg(self.keep_svg),
            Arc::new(TracingNotifier),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> PressConfig {
        let mut argv = vec!["puzzle-press"];
        argv.extend_from_slice(args);
        PressConfig::from(CliArgs::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--input", "payload.json"]);
        assert_eq!(config.request.kind, PuzzleKind::WordSearch);
        assert_eq!(config.request.grid_size, 10);
        assert!(config.style.is_sequential);
        assert!(!config.keep_svg);
        assert_eq!(config.out_dir, PathBuf::from("."));
    }

    #[test]
    fn test_request_and_style_from_args() {
        let config = parse(&[
            "--service-url",
            "http://localhost:9000",
            "--kind",
            "word-scramble",
            "--words",
            "apple, pear,,plum",
            "--count",
            "3",
            "--difficulty",
            "hard",
            "--sequential",
            "false",
            "--name",
            "Fruit Bowl",
            "--puzzle-title",
            "Unscramble",
        ]);
        assert_eq!(config.request.kind, PuzzleKind::WordScramble);
        assert_eq!(config.request.words, vec!["apple", "pear", "plum"]);
        assert_eq!(config.request.difficulty, Difficulty::Hard);
        assert_eq!(config.style.puzzle_heading(2, 3), "Unscramble 2");
        assert_eq!(config.style.custom_file_base(), Some("Fruit Bowl"));
    }

    #[test]
    fn test_input_conflicts_with_service() {
        let parsed = CliArgs::try_parse_from([
            "puzzle-press",
            "--input",
            "a.json",
            "--service-url",
            "http://localhost",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(CliArgs::try_parse_from(["puzzle-press", "--kind", "sudoku"]).is_err());
    }

    #[test]
    fn test_source_required() {
        let config = PressConfig::default();
        assert!(matches!(config.source(), Err(PressError::Config(_))));
        let config = PressConfig {
            service_url: Some("::bad::".to_string()),
            ..PressConfig::default()
        };
        assert!(matches!(config.source(), Err(PressError::InvalidUrl(_))));
    }
}
