//! Gravity module - column collapse and refill
//!
//! After removal, tokens in each touched column fall straight down to fill the
//! gaps below them. Columns never interact. Each column is compacted in a scratch
//! buffer and written back in one piece, so a column is never observable half
//! collapsed.

use crate::grid::Grid;
use crate::rng::TokenSource;
use crate::types::Cell;

/// What happened to one column during [`settle`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSettle {
    pub col: usize,
    /// `(from_row, to_row)` for every token that moved, bottom-most first.
    pub moves: Vec<(usize, usize)>,
    /// Rows that received a fresh token, top to bottom.
    pub refilled: Vec<usize>,
}

/// Compact `column` (top to bottom) towards the bottom.
///
/// Two-pointer scan from the bottom: `write` marks the next free slot and only
/// ever trails `read`, so relative order is preserved.
fn compact(column: &[Cell], out: &mut Vec<Cell>, moves: &mut Vec<(usize, usize)>) -> usize {
    out.clear();
    out.resize(column.len(), None);
    let mut write = column.len();
    for read in (0..column.len()).rev() {
        if let Some(token) = column[read] {
            write -= 1;
            if write != read {
                moves.push((read, write));
            }
            out[write] = Some(token);
        }
    }
    write
}

/// Collapse one column given top to bottom.
///
/// Returns the compacted column and the number of vacated cells, which all end
/// up on top.
///
/// ```
/// use autumn_burst_core::gravity::collapse_column;
/// use autumn_burst_core::types::Token;
///
/// let a = Token::from_char('A');
/// let b = Token::from_char('B');
/// let (col, vacated) = collapse_column(&[a, None, b, None]);
/// assert_eq!(col, vec![None, None, a, b]);
/// assert_eq!(vacated, 2);
/// ```
pub fn collapse_column(column: &[Cell]) -> (Vec<Cell>, usize) {
    let mut out = Vec::with_capacity(column.len());
    let vacated = compact(column, &mut out, &mut Vec::new());
    (out, vacated)
}

fn settle_column(
    grid: &mut Grid,
    col: usize,
    refill: Option<&mut (dyn TokenSource + '_)>,
    kinds: u8,
    scratch: &mut Vec<Cell>,
) -> Option<ColumnSettle> {
    let column = grid.column(col)?;
    let mut report = ColumnSettle {
        col,
        ..ColumnSettle::default()
    };
    let vacated = compact(&column, scratch, &mut report.moves);

    if let Some(source) = refill {
        for (row, cell) in scratch.iter_mut().enumerate().take(vacated) {
            *cell = Some(source.next_token(kinds));
            report.refilled.push(row);
        }
    }

    grid.write_column(col, scratch).ok()?;
    Some(report)
}

/// Collapse the listed columns and optionally refill their vacated cells.
///
/// Duplicate and out-of-range column indices are ignored. Reports come back in
/// ascending column order; refill tokens are drawn column by column, top to
/// bottom.
pub fn settle(
    grid: &mut Grid,
    columns: &[usize],
    mut refill: Option<&mut dyn TokenSource>,
    kinds: u8,
) -> Vec<ColumnSettle> {
    let mut cols = columns.to_vec();
    cols.sort_unstable();
    cols.dedup();

    let mut scratch = Vec::with_capacity(grid.height());
    cols.into_iter()
        .filter_map(|col| settle_column(grid, col, refill.as_deref_mut(), kinds, &mut scratch))
        .collect()
}
