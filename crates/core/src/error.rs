//! Error types for the engine.
//!
//! Only structural problems are errors: bad coordinates and bad configuration.
//! Gameplay outcomes (no match, no moves, game over) are reported as values
//! and events.

use thiserror::Error;

/// Errors raised by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Coordinate outside the grid. The operation was rejected without side effects.
    #[error("coordinate ({row}, {col}) is outside the {width}x{height} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// Configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Fatal configuration problems. A game cannot be built from a config that
/// produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// No token kinds to draw from.
    #[error("token alphabet is empty")]
    EmptyAlphabet,

    /// More kinds requested than the alphabet holds.
    #[error("token alphabet holds at most {max} kinds, got {kinds}")]
    AlphabetTooLarge { kinds: u8, max: u8 },

    /// A cluster of one would burst every tile.
    #[error("minimum cluster size must be at least 2, got {0}")]
    MinClusterTooSmall(usize),

    /// Level thresholds would never increase.
    #[error("level threshold step must be positive")]
    FlatLevelCurve,

    /// Level cap below level 1.
    #[error("maximum level must be at least 1")]
    NoLevels,

    /// A single refilled token kind rebuilds a full-board cluster on every pass.
    #[error("refilling boards need at least 2 token kinds, got {0}")]
    RefillNeedsTwoKinds(u8),

    /// Mode name not recognised by settings parsing.
    #[error("unknown game mode: {0}")]
    UnknownMode(String),
}

/// Errors from parsing the text grid format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    /// No rows at all.
    #[error("grid text has no rows")]
    Empty,

    /// A row is wider or narrower than the first one.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Character is neither a token letter nor `.`.
    #[error("unknown cell '{ch}' at ({row}, {col})")]
    UnknownToken { ch: char, row: usize, col: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_names_grid() {
        let err = EngineError::OutOfBounds {
            row: 9,
            col: 1,
            width: 8,
            height: 8,
        };
        assert_eq!(
            err.to_string(),
            "coordinate (9, 1) is outside the 8x8 grid"
        );
    }

    #[test]
    fn config_error_converts_into_engine_error() {
        let err: EngineError = ConfigError::MinClusterTooSmall(1).into();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::MinClusterTooSmall(1))
        ));
        assert!(err.to_string().contains("at least 2"));
    }
}
