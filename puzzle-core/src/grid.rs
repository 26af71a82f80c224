//! Puzzle grids, cells and word placements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PuzzleError, PuzzleResult};

/// What a cell contributes to the rendered grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Meaningful content: the value is drawn as a glyph.
    #[default]
    Glyph,
    /// Blank filler: no glyph, an empty block in solution fills.
    Blank,
    /// Shaded marker: no glyph, a filled block in solution fills.
    Shaded,
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CellRepr")]
pub struct Cell {
    /// Display value (letter, number, or empty).
    pub value: String,
    /// Content flag.
    pub kind: CellKind,
}

/// Wire representation accepted from the generation service.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Text(String),
    Full {
        #[serde(default)]
        value: String,
        #[serde(default)]
        kind: CellKind,
    },
}

impl From<CellRepr> for Cell {
    fn from(repr: CellRepr) -> Self {
        match repr {
            CellRepr::Text(text) => Self::from_text(&text),
            CellRepr::Full { value, kind } => Self { value, kind },
        }
    }
}

impl Cell {
    /// A cell carrying a drawable glyph.
    #[must_use]
    pub fn glyph(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: CellKind::Glyph,
        }
    }

    /// A blank filler cell.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            value: String::new(),
            kind: CellKind::Blank,
        }
    }

    /// A shaded (filled block) cell.
    #[must_use]
    pub fn shaded() -> Self {
        Self {
            value: String::new(),
            kind: CellKind::Shaded,
        }
    }

    /// Interpret a bare string: empty/whitespace is blank, `#` is shaded.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        match text.trim() {
            "" => Self::blank(),
            "#" => Self::shaded(),
            other => Self::glyph(other),
        }
    }

    /// Whether a glyph should be drawn for this cell.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.kind == CellKind::Glyph && !self.value.trim().is_empty()
    }

    /// Whether the solution fill marks this cell as a filled block.
    #[must_use]
    pub fn is_filled_block(&self) -> bool {
        self.kind == CellKind::Shaded
    }
}

/// Row/column address of a grid cell (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Row index from the top.
    pub row: usize,
    /// Column index from the left.
    pub col: usize,
}

impl GridCoord {
    /// Create a coordinate.
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A rectangular grid of cells. Dimensions are fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct PuzzleGrid {
    rows: Vec<Vec<Cell>>,
    cols: usize,
}

impl PuzzleGrid {
    /// Build a grid, rejecting rows of unequal length.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::RaggedGrid`] if any row differs in length from row 0.
    pub fn new(rows: Vec<Vec<Cell>>) -> PuzzleResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != cols)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(PuzzleError::RaggedGrid {
                row,
                expected: cols,
                found,
            });
        }
        Ok(Self { rows, cols })
    }

    /// Build a grid from lines of text, one character per cell.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::RaggedGrid`] if the lines differ in length.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> PuzzleResult<Self> {
        let rows = lines
            .iter()
            .map(|line| {
                line.as_ref()
                    .chars()
                    .map(|c| Cell::from_text(&c.to_string()))
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// A grid with no cells has nothing to render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols == 0
    }

    /// Cell at a coordinate, if inside the grid.
    #[must_use]
    pub fn cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.rows.get(coord.row).and_then(|r| r.get(coord.col))
    }

    /// Whether a coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.row < self.rows() && coord.col < self.cols
    }

    /// Iterate over every cell with its coordinate, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (GridCoord::new(r, c), cell))
        })
    }
}

impl TryFrom<Vec<Vec<Cell>>> for PuzzleGrid {
    type Error = PuzzleError;

    fn try_from(rows: Vec<Vec<Cell>>) -> PuzzleResult<Self> {
        Self::new(rows)
    }
}

impl From<PuzzleGrid> for Vec<Vec<Cell>> {
    fn from(grid: PuzzleGrid) -> Self {
        grid.rows
    }
}

/// A word and its path through a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPlacement {
    /// Canonical word text.
    pub word: String,
    /// Ordered cells the word occupies.
    pub path: Vec<GridCoord>,
}

impl WordPlacement {
    /// Create a placement.
    #[must_use]
    pub fn new(word: impl Into<String>, path: Vec<GridCoord>) -> Self {
        Self {
            word: word.into(),
            path,
        }
    }

    /// Check that every coordinate lies inside `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::PlacementOutOfBounds`] for the first coordinate outside the grid.
    pub fn validate_within(&self, grid: &PuzzleGrid) -> PuzzleResult<()> {
        match self.path.iter().find(|c| !grid.contains(**c)) {
            Some(c) => Err(PuzzleError::PlacementOutOfBounds {
                word: self.word.clone(),
                row: c.row,
                col: c.col,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_grid_rejected() {
        let err = PuzzleGrid::new(vec![
            vec![Cell::glyph("A"), Cell::glyph("B")],
            vec![Cell::glyph("C")],
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_from_lines_classifies_cells() {
        let grid = PuzzleGrid::from_lines(&["A #", "3 B"]).expect("grid");
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert!(grid.cell(GridCoord::new(0, 0)).unwrap().has_content());
        assert_eq!(grid.cell(GridCoord::new(0, 1)).unwrap().kind, CellKind::Blank);
        assert!(grid.cell(GridCoord::new(0, 2)).unwrap().is_filled_block());
    }

    #[test]
    fn test_empty_grid() {
        let grid = PuzzleGrid::new(Vec::new()).expect("empty grid is legal");
        assert!(grid.is_empty());
        assert_eq!(grid.cells().count(), 0);
    }

    #[test]
    fn test_cell_deserializes_from_string_or_object() {
        let cells: Vec<Cell> =
            serde_json::from_str(r##"["Q", "", "#", {"value": "7", "kind": "glyph"}]"##)
                .expect("cells");
        assert_eq!(cells[0], Cell::glyph("Q"));
        assert_eq!(cells[1], Cell::blank());
        assert_eq!(cells[2], Cell::shaded());
        assert_eq!(cells[3], Cell::glyph("7"));
    }

    #[test]
    fn test_grid_deserialize_rejects_ragged() {
        let result: Result<PuzzleGrid, _> = serde_json::from_str(r#"[["A","B"],["C"]]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_placement_bounds() {
        let grid = PuzzleGrid::from_lines(&["AB", "CD"]).expect("grid");
        let inside = WordPlacement::new("AD", vec![GridCoord::new(0, 0), GridCoord::new(1, 1)]);
        assert!(inside.validate_within(&grid).is_ok());

        let outside = WordPlacement::new("AX", vec![GridCoord::new(0, 0), GridCoord::new(2, 0)]);
        assert!(matches!(
            outside.validate_within(&grid),
            Err(PuzzleError::PlacementOutOfBounds { row: 2, col: 0, .. })
        ));
    }
}
