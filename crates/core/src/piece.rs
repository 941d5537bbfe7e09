//! Falling token and preview queue for drop mode.

use crate::grid::Grid;
use crate::rng::TokenSource;
use crate::types::{Coord, Token, DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, NEXT_QUEUE_LEN};

/// The single token currently falling through the well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingToken {
    pub token: Token,
    pub at: Coord,
}

impl FallingToken {
    /// Spawn position: top row, centre column.
    pub fn spawn(token: Token, grid: &Grid) -> Self {
        Self {
            token,
            at: spawn_coord(grid),
        }
    }

    /// Position one step away, if that cell is on the board and empty.
    pub fn shifted(&self, grid: &Grid, d_row: isize, d_col: isize) -> Option<Coord> {
        let row = self.at.row.checked_add_signed(d_row)?;
        let col = self.at.col.checked_add_signed(d_col)?;
        match grid.get(row, col) {
            Some(None) => Some(Coord::new(row, col)),
            _ => None,
        }
    }

    pub fn is_grounded(&self, grid: &Grid) -> bool {
        self.shifted(grid, 1, 0).is_none()
    }

    /// Row the token would land on if dropped straight down.
    pub fn landing_row(&self, grid: &Grid) -> usize {
        let mut row = self.at.row;
        while grid.get(row + 1, self.at.col) == Some(None) {
            row += 1;
        }
        row
    }
}

pub fn spawn_coord(grid: &Grid) -> Coord {
    Coord::new(0, grid.width() / 2)
}

/// Gravity interval for drop mode at `level` (1-based).
///
/// ```
/// use autumn_burst_core::piece::drop_interval_ms;
///
/// assert_eq!(drop_interval_ms(1), 1000);
/// assert_eq!(drop_interval_ms(9), 160);
/// assert_eq!(drop_interval_ms(40), 120);
/// ```
pub fn drop_interval_ms(level: u32) -> u32 {
    let idx = level.saturating_sub(1) as usize;
    DROP_INTERVALS
        .get(idx)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
}

/// Upcoming tokens, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextQueue {
    tokens: [Token; NEXT_QUEUE_LEN],
}

impl NextQueue {
    pub fn new(source: &mut dyn TokenSource, kinds: u8) -> Self {
        let mut tokens = [Token::wrapping(0); NEXT_QUEUE_LEN];
        for slot in tokens.iter_mut() {
            *slot = source.next_token(kinds);
        }
        Self { tokens }
    }

    /// Take the front token and append a fresh one at the back.
    pub fn pop(&mut self, source: &mut dyn TokenSource, kinds: u8) -> Token {
        let front = self.tokens[0];
        self.tokens.rotate_left(1);
        self.tokens[NEXT_QUEUE_LEN - 1] = source.next_token(kinds);
        front
    }

    pub fn peek(&self) -> &[Token; NEXT_QUEUE_LEN] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedTokens;

    #[test]
    fn test_spawn_in_centre() {
        let grid = Grid::new(8, 10).unwrap();
        let t = FallingToken::spawn(Token::wrapping(1), &grid);
        assert_eq!(t.at, Coord::new(0, 4));
    }

    #[test]
    fn test_shifted_respects_walls_and_tokens() {
        let grid: Grid = "...\n.A.\n...".parse().unwrap();
        let t = FallingToken {
            token: Token::wrapping(0),
            at: Coord::new(0, 1),
        };
        assert_eq!(t.shifted(&grid, 0, -1), Some(Coord::new(0, 0)));
        assert_eq!(t.shifted(&grid, 1, 0), None);
        assert!(t.is_grounded(&grid));

        let edge = FallingToken {
            at: Coord::new(2, 0),
            ..t
        };
        assert_eq!(edge.shifted(&grid, 0, -1), None);
        assert_eq!(edge.shifted(&grid, 1, 0), None);
    }

    #[test]
    fn test_landing_row() {
        let grid: Grid = "..\n..\n.B\n..".parse().unwrap();
        let left = FallingToken {
            token: Token::wrapping(0),
            at: Coord::new(0, 0),
        };
        assert_eq!(left.landing_row(&grid), 3);
        let right = FallingToken {
            at: Coord::new(0, 1),
            ..left
        };
        assert_eq!(right.landing_row(&grid), 1);
    }

    #[test]
    fn test_next_queue_rotates() {
        let mut src = ScriptedTokens::from_letters("ABCDE");
        let mut q = NextQueue::new(&mut src, 5);
        assert_eq!(q.peek().map(Token::as_char), ['A', 'B', 'C']);
        assert_eq!(q.pop(&mut src, 5).as_char(), 'A');
        assert_eq!(q.peek().map(Token::as_char), ['B', 'C', 'D']);
    }
}
