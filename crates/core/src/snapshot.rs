//! Read-only view of a game for presentation.
//!
//! Board cells are encoded as `0` for empty and `token index + 1` otherwise.
//! `board_hash` is FNV-1a 64 over those codes in row-major order, so a renderer
//! can skip work when the board has not changed.

use crate::types::{Coord, GameMode, Token, NEXT_QUEUE_LEN};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001B3;

/// FNV-1a 64-bit over a byte stream.
pub fn fnv1a64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    bytes.into_iter().fold(FNV_OFFSET, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingSnapshot {
    pub token: Token,
    pub at: Coord,
    /// Where a hard drop would put it.
    pub landing_row: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub width: usize,
    pub height: usize,
    /// Row-major cell codes, `width * height` long.
    pub board: Vec<u8>,
    pub board_hash: u64,
    pub falling: Option<FallingSnapshot>,
    pub next: [Option<Token>; NEXT_QUEUE_LEN],
    pub score: u64,
    pub level: u32,
    pub combo: u32,
    /// Progress towards the next level, `0.0..=1.0`.
    pub progress: f32,
    pub resolving: bool,
    pub paused: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub seed: u32,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            mode: GameMode::Burst,
            width: 0,
            height: 0,
            board: Vec::new(),
            board_hash: fnv1a64([]),
            falling: None,
            next: [None; NEXT_QUEUE_LEN],
            score: 0,
            level: 1,
            combo: 0,
            progress: 0.0,
            resolving: false,
            paused: false,
            game_over: false,
            episode_id: 0,
            seed: 0,
        }
    }
}

impl GameSnapshot {
    /// Cell code at (row, col); `None` outside the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.board.get(row * self.width + col).copied()
    }

    /// Token at (row, col), decoding the cell code.
    pub fn token(&self, row: usize, col: usize) -> Option<Token> {
        match self.cell(row, col)? {
            0 => None,
            code => Token::new(code - 1),
        }
    }

    /// Recompute `board_hash` from `board`.
    pub fn rehash(&mut self) {
        self.board_hash = fnv1a64(self.board.iter().copied());
    }

    /// Whether the game currently accepts input.
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_known_vectors() {
        assert_eq!(fnv1a64([]), 0xcbf29ce484222325);
        assert_eq!(fnv1a64(*b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn token_decoding() {
        let mut snap = GameSnapshot {
            width: 2,
            height: 1,
            board: vec![0, 3],
            ..GameSnapshot::default()
        };
        snap.rehash();
        assert_eq!(snap.token(0, 0), None);
        assert_eq!(snap.token(0, 1).map(Token::as_char), Some('C'));
        assert_eq!(snap.cell(1, 0), None);
        assert_eq!(snap.board_hash, fnv1a64([0, 3]));
    }
}
