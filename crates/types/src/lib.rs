//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they are usable
//! from the matching engine, the terminal front end and tests alike.
//!
//! # Board Dimensions
//!
//! - **Burst mode**: 8 columns x 8 rows, board always full
//! - **Drop mode**: 8 columns x 10 rows, board starts empty
//!
//! Coordinates are `(row, col)` with row 0 at the top.
//!
//! # Timing Constants
//!
//! Timing values are logical milliseconds supplied by the caller; the engine
//! never reads a clock.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep of the terminal runner (~60 FPS) |
//! | `CASCADE_STEP_MS` | 400 | Pause between chain-reaction passes |
//! | `DROP_INTERVALS` | 1000..160 | Drop-mode gravity by level |
//!
//! # Examples
//!
//! ```
//! use autumn_burst_types::{Coord, GameAction, Token, MAX_TOKEN_KINDS};
//!
//! let leaf = Token::new(0).unwrap();
//! assert_eq!(leaf.name(), "leaf");
//! assert_eq!(Token::from_char('a'), Some(leaf));
//! assert!(Token::new(MAX_TOKEN_KINDS).is_none());
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! let c = Coord::new(2, 3);
//! assert_eq!((c.row, c.col), (2, 3));
//! ```

use std::fmt;

/// Default board width in burst mode.
pub const DEFAULT_WIDTH: usize = 8;

/// Default board height in burst mode.
pub const DEFAULT_HEIGHT: usize = 8;

/// Default board height in drop mode (taller well for the falling token).
pub const DROP_HEIGHT: usize = 10;

/// Smallest cluster that bursts.
pub const MIN_CLUSTER_SIZE: usize = 4;

/// Size of the full token alphabet.
pub const MAX_TOKEN_KINDS: u8 = 8;

/// Token kinds used by drop mode.
pub const DROP_TOKEN_KINDS: u8 = 5;

/// Points per cleared token before the combo factor (combo rule).
pub const BASE_POINTS: u32 = 10;

/// Points per cleared token (board-scan rule).
pub const PER_TOKEN_POINTS: u32 = 10;

/// Flat bonus per qualifying cluster in a pass (board-scan rule).
pub const CLUSTER_BONUS: u32 = 50;

/// Bonus per token beyond the minimum cluster size (board-scan rule).
pub const OVERFLOW_BONUS: u32 = 20;

/// Score needed to leave level 1.
pub const LEVEL_THRESHOLD_STEP: u64 = 1000;

/// Extra threshold added for every level past the first.
pub const LEVEL_THRESHOLD_GROWTH: u64 = 500;

/// Multiplier gained per level, in per-mille (100 = +10%).
pub const MULTIPLIER_STEP_PERMILLE: u64 = 100;

/// Highest reachable level. Score keeps growing past it, the level does not.
pub const MAX_LEVEL: u32 = 99;

/// Per-mille denominator.
pub const PERMILLE: u64 = 1000;

/// Fixed timestep of the terminal runner (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// Pause between chain-reaction passes.
pub const CASCADE_STEP_MS: u32 = 400;

/// Drop-mode gravity interval by level (index 0 = level 1).
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Drop-mode gravity floor past the end of `DROP_INTERVALS`.
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Number of upcoming tokens previewed in drop mode.
pub const NEXT_QUEUE_LEN: usize = 3;

/// Shuffle attempts before a stuck board is refilled from scratch.
pub const SHUFFLE_ATTEMPTS: u32 = 32;

const TOKEN_NAMES: [&str; MAX_TOKEN_KINDS as usize] = [
    "leaf",
    "pumpkin",
    "acorn",
    "apple",
    "mushroom",
    "sunflower",
    "pie",
    "books",
];

/// One tile type.
///
/// Tokens are opaque indices into an alphabet of at most [`MAX_TOKEN_KINDS`]
/// symbols. Equality is the only behaviour the engine relies on; names and
/// letters exist for display and the text grid format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u8);

impl Token {
    /// Create a token from its alphabet index.
    ///
    /// ```
    /// use autumn_burst_types::Token;
    ///
    /// assert_eq!(Token::new(3).map(|t| t.index()), Some(3));
    /// assert_eq!(Token::new(8), None);
    /// ```
    pub fn new(index: u8) -> Option<Self> {
        (index < MAX_TOKEN_KINDS).then_some(Self(index))
    }

    /// Create a token, folding out-of-range indices back into the alphabet.
    pub fn wrapping(index: u8) -> Self {
        Self(index % MAX_TOKEN_KINDS)
    }

    /// Alphabet index of this token.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Human readable name (leaf, pumpkin, ...).
    pub fn name(self) -> &'static str {
        TOKEN_NAMES[self.0 as usize]
    }

    /// Single uppercase letter used by the text grid format (`A` = index 0).
    pub fn as_char(self) -> char {
        (b'A' + self.0) as char
    }

    /// Parse a token letter (case-insensitive).
    ///
    /// ```
    /// use autumn_burst_types::Token;
    ///
    /// assert_eq!(Token::from_char('C').map(|t| t.index()), Some(2));
    /// assert_eq!(Token::from_char('h').map(|t| t.index()), Some(7));
    /// assert_eq!(Token::from_char('.'), None);
    /// ```
    pub fn from_char(ch: char) -> Option<Self> {
        let upper = ch.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        Self::new(upper as u8 - b'A')
    }

    /// Parse a token name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        TOKEN_NAMES
            .iter()
            .position(|name| *name == lower)
            .map(|i| Self(i as u8))
    }

    /// Iterate the first `kinds` tokens of the alphabet.
    pub fn alphabet(kinds: u8) -> impl Iterator<Item = Token> {
        (0..kinds.min(MAX_TOKEN_KINDS)).map(Token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell on the board
///
/// - `None`: empty cell
/// - `Some(Token)`: cell holding a tile
pub type Cell = Option<Token>;

/// A board coordinate; row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Input model of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// Click a cell to burst its cluster; the board is always full.
    #[default]
    Burst,
    /// A single token falls into an initially empty well and is resolved on landing.
    Drop,
}

impl GameMode {
    /// Parse a mode name (case-insensitive).
    ///
    /// ```
    /// use autumn_burst_types::GameMode;
    ///
    /// assert_eq!(GameMode::from_str("Burst"), Some(GameMode::Burst));
    /// assert_eq!(GameMode::from_str("drop"), Some(GameMode::Drop));
    /// assert_eq!(GameMode::from_str("classic"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "burst" => Some(GameMode::Burst),
            "drop" => Some(GameMode::Drop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Burst => "burst",
            GameMode::Drop => "drop",
        }
    }
}

/// Game actions besides cell activation.
///
/// Movement actions only apply in drop mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the falling token one column left
    MoveLeft,
    /// Move the falling token one column right
    MoveRight,
    /// Move the falling token one row down
    SoftDrop,
    /// Drop the falling token to its landing row and lock it
    HardDrop,
    /// Toggle pause state
    Pause,
    /// Restart the game
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use autumn_burst_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("PAUSE"), Some(GameAction::Pause));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_letters_roundtrip_whole_alphabet() {
        for token in Token::alphabet(MAX_TOKEN_KINDS) {
            assert_eq!(Token::from_char(token.as_char()), Some(token));
            assert_eq!(Token::from_name(token.name()), Some(token));
        }
    }

    #[test]
    fn alphabet_is_clamped_to_max_kinds() {
        assert_eq!(Token::alphabet(5).count(), 5);
        assert_eq!(Token::alphabet(200).count(), MAX_TOKEN_KINDS as usize);
        assert_eq!(Token::alphabet(0).count(), 0);
    }

    #[test]
    fn from_char_rejects_letters_past_alphabet() {
        assert_eq!(Token::from_char('I'), None);
        assert_eq!(Token::from_char('z'), None);
        assert_eq!(Token::from_char('1'), None);
    }

    #[test]
    fn drop_intervals_are_decreasing() {
        assert!(DROP_INTERVALS.windows(2).all(|w| w[0] > w[1]));
        assert!(DROP_INTERVAL_FLOOR_MS < DROP_INTERVALS[DROP_INTERVALS.len() - 1]);
    }

    #[test]
    fn action_strings_roundtrip() {
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::Pause,
            GameAction::Restart,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }
}
