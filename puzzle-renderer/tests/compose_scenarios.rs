//! End-to-end composition scenarios.

use std::sync::Arc;

use puzzle_core::{
    DotToDotPuzzle, GridCoord, HangmanPuzzle, MarkerBoard, PuzzleGrid, PuzzlePayload,
    ScrambledWord, StyleParameters, WordPlacement, WordSearchPuzzle,
};
use puzzle_renderer::backend::recording::RecordingSurface;
use puzzle_renderer::backend::Surface;
use puzzle_renderer::compose::scramble;
use puzzle_renderer::fonts::MemoryFontSource;
use puzzle_renderer::{
    Artifact, ComposeContext, FontProvisioner, FontRegistry, LayoutConfig, PageSize,
    PuzzleComposer, Section,
};
use usvg::fontdb;

fn provisioner() -> FontProvisioner {
    FontProvisioner::with_database(
        Arc::new(MemoryFontSource::new()),
        FontRegistry::new(),
        fontdb::Database::new(),
    )
}

const TUFFY: &[u8] = include_bytes!("fonts/Tuffy.ttf");

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn composer(layout: LayoutConfig) -> PuzzleComposer {
    PuzzleComposer::new(provisioner(), layout)
}

fn word_search() -> WordSearchPuzzle {
    let lines = [
        "CATQWERTYU",
        "DOGASDFGHJ",
        "OWLZXCVBNM",
        "FOXPLMOKNI",
        "BEEUJNHYBG",
        "QAZWSXEDCR",
        "RFVTGBYHNU",
        "JMIKOLPQAZ",
        "WSXEDCRFVT",
        "GBYHNUJMIK",
    ];
    let row = |r: usize, len: usize| (0..len).map(|c| GridCoord::new(r, c)).collect();
    WordSearchPuzzle {
        grid: PuzzleGrid::from_lines(&lines).unwrap(),
        words: ["owl", "cat", "fox", "bee", "dog"]
            .iter()
            .map(ToString::to_string)
            .collect(),
        placements: vec![
            WordPlacement::new("CAT", row(0, 3)),
            WordPlacement::new("DOG", row(1, 3)),
            WordPlacement::new("OWL", row(2, 3)),
            WordPlacement::new("FOX", row(3, 3)),
            WordPlacement::new("BEE", row(4, 3)),
        ],
    }
}

fn scrambled(count: usize) -> Vec<ScrambledWord> {
    (0..count)
        .map(|i| ScrambledWord {
            scrambled: format!("drow{i}"),
            answer: format!("word{i}"),
        })
        .collect()
}

#[tokio::test]
async fn word_search_produces_puzzle_and_solution_images() {
    let composer = composer(LayoutConfig::default());
    let payload = PuzzlePayload::WordSearch {
        puzzles: vec![word_search()],
    };
    let style = StyleParameters::default();

    let artifact = composer.compose(&payload, &style).await.unwrap().unwrap();
    let Artifact::Images(batch) = artifact else {
        panic!("word search must produce images");
    };

    assert_eq!(batch.len(), 2);
    let pages = batch.pages();
    assert_eq!(pages[0].section, Section::Puzzle);
    assert_eq!(pages[1].section, Section::Solution);
    assert!(pages[0].svg.contains(">Puzzle 1</text>"));
    assert!(pages[1].svg.contains(">Solution 1</text>"));
    assert_eq!(batch.filename(&pages[0]), "wordsearch_puzzle_1.png");
    assert_eq!(batch.filename(&pages[1]), "wordsearch_solution_1.png");

    let png = batch.render(&pages[0]).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn raster_pages_interleave_puzzles_and_solutions() {
    let composer = composer(LayoutConfig::default());
    let payload = PuzzlePayload::WordSearch {
        puzzles: vec![word_search(), word_search()],
    };
    let style = StyleParameters {
        is_sequential: false,
        custom_name: Some("Zoo Day".to_string()),
        puzzle_title: Some("Find the Animals".to_string()),
        ..StyleParameters::default()
    };

    let Some(Artifact::Images(batch)) = composer.compose(&payload, &style).await.unwrap() else {
        panic!("expected images");
    };
    let names: Vec<_> = batch.pages().iter().map(|p| batch.filename(p)).collect();
    assert_eq!(
        names,
        vec![
            "Zoo_Day_puzzle_1.png",
            "Zoo_Day_solution_1.png",
            "Zoo_Day_puzzle_2.png",
            "Zoo_Day_solution_2.png",
        ]
    );
    assert!(batch.pages()[0].svg.contains(">Find the Animals 1</text>"));
    assert!(batch.pages()[2].svg.contains(">Find the Animals 2</text>"));
}

#[tokio::test]
async fn single_puzzle_keeps_custom_title_unnumbered() {
    let composer = composer(LayoutConfig::default());
    let payload = PuzzlePayload::WordSearch {
        puzzles: vec![word_search()],
    };
    // The service returned fewer puzzles than were requested.
    let style = StyleParameters {
        is_sequential: false,
        puzzle_title: Some("Find the Animals".to_string()),
        puzzle_count: 3,
        ..StyleParameters::default()
    };

    let Some(Artifact::Images(batch)) = composer.compose(&payload, &style).await.unwrap() else {
        panic!("expected images");
    };
    assert_eq!(batch.len(), 2);
    assert!(batch.pages()[0].svg.contains(">Find the Animals</text>"));
}

#[tokio::test]
async fn dot_to_dot_without_markers_produces_nothing() {
    let composer = composer(LayoutConfig::default());
    let payload = PuzzlePayload::DotToDot(DotToDotPuzzle {
        board: MarkerBoard::new(800.0, 600.0),
    });

    assert!(!payload.can_generate());
    let artifact = composer
        .compose(&payload, &StyleParameters::default())
        .await
        .unwrap();
    assert!(artifact.is_none());
}

#[tokio::test]
async fn scrambled_words_overflow_onto_second_page() {
    let layout = LayoutConfig {
        document_page: PageSize::new(595.0, 420.0),
        ..LayoutConfig::default()
    };
    let per_column = scramble::lines_per_column(&layout, layout.document_page);
    let words = scrambled(25);
    assert!(words.len() > 2 * per_column, "{per_column} lines per column");

    let fonts = provisioner().ensure_fonts_ready(["arial"]).await;
    let style = StyleParameters::default();
    let ctx = ComposeContext::new(&style, &fonts, &layout);
    let mut surface = RecordingSurface::new(layout.document_page);
    scramble::compose(&mut surface, &ctx, &words).unwrap();

    let pages_per_section = words.len().div_ceil(2 * per_column);
    assert!(pages_per_section >= 2);
    assert_eq!(surface.page_count(), pages_per_section * 2);
    assert_eq!(surface.texts_on(1)[0], "Puzzle 1");
    assert_eq!(surface.texts_on(pages_per_section)[0], "Solution 1");

    let composed = composer(layout)
        .compose(&PuzzlePayload::WordScramble { entries: words }, &style)
        .await
        .unwrap();
    let Some(Artifact::Document { title, bytes }) = composed else {
        panic!("scramble must produce a document");
    };
    assert_eq!(title, "wordscramble");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn short_scramble_sheet_stays_on_one_page() {
    let layout = LayoutConfig::default();
    let per_column = scramble::lines_per_column(&layout, layout.document_page);
    let words = scrambled(2 * per_column);

    let fonts = provisioner().ensure_fonts_ready(["arial"]).await;
    let style = StyleParameters::default();
    let ctx = ComposeContext::new(&style, &fonts, &layout);
    let mut surface = RecordingSurface::new(layout.document_page);
    scramble::compose(&mut surface, &ctx, &words).unwrap();
    assert_eq!(surface.page_count(), 2);
}

#[tokio::test]
async fn unknown_custom_font_falls_back_without_error() {
    let composer = composer(LayoutConfig::default());
    for font in ["patrick-hand", "Not A Real Font"] {
        let style = StyleParameters {
            font_family: font.to_string(),
            ..StyleParameters::default()
        };
        let payload = PuzzlePayload::Hangman {
            puzzles: vec![HangmanPuzzle {
                phrase: "Mind the gap".to_string(),
                category: Some("Travel".to_string()),
            }],
        };
        let artifact = composer.compose(&payload, &style).await.unwrap();
        let Some(Artifact::Document { bytes, .. }) = artifact else {
            panic!("hangman must produce a document");
        };
        assert!(bytes.starts_with(b"%PDF"));

        let images = composer
            .compose(
                &PuzzlePayload::WordSearch {
                    puzzles: vec![word_search()],
                },
                &style,
            )
            .await
            .unwrap();
        let Some(Artifact::Images(batch)) = images else {
            panic!("expected images");
        };
        assert!(batch.pages()[0].svg.contains(&format!("'{}'", font.trim())));
        assert!(batch.render(&batch.pages()[0]).is_ok());
    }
    assert!(composer.provisioner().registry().is_empty());
}

#[tokio::test]
async fn custom_font_is_registered_and_embedded() {
    let source = MemoryFontSource::new().with_font("schoolbell", TUFFY.to_vec());
    let provisioner = FontProvisioner::with_database(
        Arc::new(source),
        FontRegistry::new(),
        fontdb::Database::new(),
    );
    let ready = provisioner.ensure_fonts_ready(["schoolbell"]).await;
    assert_eq!(ready.resolve("schoolbell").family, "Tuffy");

    let composer = PuzzleComposer::new(provisioner, LayoutConfig::default());
    let style = StyleParameters {
        font_family: "schoolbell".to_string(),
        ..StyleParameters::default()
    };
    let payload = PuzzlePayload::Hangman {
        puzzles: vec![HangmanPuzzle {
            phrase: "Mind the gap".to_string(),
            category: None,
        }],
    };
    let Some(Artifact::Document { bytes, .. }) = composer.compose(&payload, &style).await.unwrap()
    else {
        panic!("hangman must produce a document");
    };
    assert!(contains(&bytes, b"FontFile2"));
    assert!(contains(&bytes, b"Tuffy"));

    let payload = PuzzlePayload::WordSearch {
        puzzles: vec![word_search()],
    };
    let Some(Artifact::Images(batch)) = composer.compose(&payload, &style).await.unwrap() else {
        panic!("expected images");
    };
    assert!(batch.pages()[0].svg.contains("'Tuffy'"));
    assert!(batch.render(&batch.pages()[0]).is_ok());
    assert_eq!(composer.provisioner().registry().len(), 1);
}
