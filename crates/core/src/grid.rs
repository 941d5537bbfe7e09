//! Grid module - manages the tile board
//!
//! The grid is a fixed W x H board where each cell is empty or holds a token.
//! Uses a flat row-major vector for cache locality.
//! Coordinates: (row, col) where row 0 is the top row and col 0 the left column.
//!
//! Reads outside the board return `None`; writes outside the board are
//! rejected with [`EngineError::OutOfBounds`] and leave the grid untouched.

use std::fmt;
use std::str::FromStr;

use crate::cluster::find_cluster_in;
use crate::error::{ConfigError, EngineError, GridParseError};
use crate::rng::TokenSource;
use crate::types::{Cell, Coord, Token};

/// The tile board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
        })
    }

    /// Build a grid from rows of cells (top row first).
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridParseError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).ok_or(GridParseError::Empty)?;
        if width == 0 {
            return Err(GridParseError::Empty);
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(GridParseError::Ragged {
                    row,
                    expected: width,
                    found: cols.len(),
                });
            }
            cells.extend(cols);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Calculate flat index from (row, col)
    /// Returns None if out of bounds
    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if (row, col) lies on the board
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Token at (row, col); `None` for empty or out-of-bounds cells.
    pub fn token(&self, row: usize, col: usize) -> Option<Token> {
        self.get(row, col).flatten()
    }

    /// Set cell at (row, col), overwriting whatever was there.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), EngineError> {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                Ok(())
            }
            None => Err(self.out_of_bounds(row, col)),
        }
    }

    /// Build the out-of-bounds error for this grid.
    pub fn out_of_bounds(&self, row: usize, col: usize) -> EngineError {
        EngineError::OutOfBounds {
            row,
            col,
            width: self.width,
            height: self.height,
        }
    }

    /// Copy of one column, top to bottom.
    pub fn column(&self, col: usize) -> Option<Vec<Cell>> {
        if col >= self.width {
            return None;
        }
        Some(
            (0..self.height)
                .map(|row| self.cells[row * self.width + col])
                .collect(),
        )
    }

    /// Replace one column (top to bottom) in a single write.
    ///
    /// Fails without touching the grid if the column index or length is wrong.
    pub fn write_column(&mut self, col: usize, column: &[Cell]) -> Result<(), EngineError> {
        if col >= self.width || column.len() != self.height {
            return Err(self.out_of_bounds(column.len().saturating_sub(1), col));
        }
        for (row, cell) in column.iter().enumerate() {
            self.cells[row * self.width + col] = *cell;
        }
        Ok(())
    }

    /// Empty the given cells. Out-of-bounds coordinates are skipped.
    /// Returns how many tokens were actually removed.
    pub fn remove(&mut self, coords: &[Coord]) -> usize {
        let mut removed = 0;
        for c in coords {
            if let Some(idx) = self.index(c.row, c.col) {
                if self.cells[idx].take().is_some() {
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Whether every cell holds a token.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Flat row-major view of the cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable flat view, used by shuffling.
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Coord::new(row, col)))
    }

    /// Fill every empty cell with a fresh token.
    pub fn fill_from(&mut self, source: &mut dyn TokenSource, kinds: u8) {
        for cell in self.cells.iter_mut().filter(|c| c.is_none()) {
            *cell = Some(source.next_token(kinds));
        }
    }

    /// Fill the whole board so that no cluster of `min_cluster` or more exists.
    ///
    /// Cells are drawn in row-major order. When a draw would complete a
    /// qualifying cluster with the cells already placed, the next kinds are tried
    /// in turn; with at least three kinds one of them always fits.
    pub fn fill_without_clusters(
        &mut self,
        source: &mut dyn TokenSource,
        kinds: u8,
        min_cluster: usize,
    ) {
        let kinds = kinds.max(1);
        self.clear();
        let mut scratch = Vec::new();
        for idx in 0..self.cells.len() {
            let (row, col) = (idx / self.width, idx % self.width);
            let first = source.next_token(kinds);
            let mut chosen = first;
            for offset in 0..kinds {
                let candidate = Token::wrapping((first.index() + offset) % kinds);
                self.cells[idx] = Some(candidate);
                if find_cluster_in(self, row, col, &mut scratch).len() < min_cluster {
                    chosen = candidate;
                    break;
                }
            }
            self.cells[idx] = Some(chosen);
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.width {
                let ch = match self.cells[row * self.width + col] {
                    Some(token) => token.as_char(),
                    None => '.',
                };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridParseError;

    /// Parse the text grid format: one line per row, `A`..`H` for tokens and
    /// `.` for empty cells. Blank lines and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = rows.len();
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, ch)| match ch {
                    '.' => Ok(None),
                    _ => Token::from_char(ch)
                        .map(Some)
                        .ok_or(GridParseError::UnknownToken { ch, row, col }),
                })
                .collect::<Result<Vec<Cell>, _>>()?;
            rows.push(cells);
        }
        Self::from_rows(rows)
    }
}
