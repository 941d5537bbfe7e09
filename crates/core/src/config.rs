//! Engine configuration.
//!
//! Everything that varies between burst mode and drop mode lives here, so the
//! resolver and game loop stay mode-agnostic where they can.

use crate::error::ConfigError;
use crate::scoring::{LevelCurve, ScoringRule};
use crate::types::{
    GameMode, CASCADE_STEP_MS, DEFAULT_HEIGHT, DEFAULT_WIDTH, DROP_HEIGHT, DROP_TOKEN_KINDS,
    MAX_TOKEN_KINDS, MIN_CLUSTER_SIZE,
};

/// Tunables for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    pub mode: GameMode,
    pub width: usize,
    pub height: usize,
    /// Number of distinct tokens in play (1..=8).
    pub token_kinds: u8,
    /// Smallest cluster that bursts.
    pub min_cluster: usize,
    pub scoring: ScoringRule,
    /// Refill vacated cells after gravity.
    pub refill: bool,
    /// Fill new boards without any qualifying cluster.
    pub avoid_initial_clusters: bool,
    /// Shuffle the board when no move is left.
    pub shuffle_when_stuck: bool,
    /// Logical delay between cascade passes; 0 resolves passes back to back.
    pub cascade_delay_ms: u32,
    pub seed: u32,
    pub level_curve: LevelCurve,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::burst()
    }
}

impl EngineConfig {
    /// Click-to-burst on a full 8x8 board with all eight tokens.
    pub fn burst() -> Self {
        Self {
            mode: GameMode::Burst,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            token_kinds: MAX_TOKEN_KINDS,
            min_cluster: MIN_CLUSTER_SIZE,
            scoring: ScoringRule::combo(),
            refill: true,
            avoid_initial_clusters: false,
            shuffle_when_stuck: true,
            cascade_delay_ms: CASCADE_STEP_MS,
            seed: 1,
            level_curve: LevelCurve::default(),
        }
    }

    /// Falling tokens into an empty 8x10 well with five tokens.
    pub fn drop() -> Self {
        Self {
            mode: GameMode::Drop,
            width: DEFAULT_WIDTH,
            height: DROP_HEIGHT,
            token_kinds: DROP_TOKEN_KINDS,
            min_cluster: MIN_CLUSTER_SIZE,
            scoring: ScoringRule::board_scan(),
            refill: false,
            avoid_initial_clusters: false,
            shuffle_when_stuck: false,
            cascade_delay_ms: CASCADE_STEP_MS,
            seed: 1,
            level_curve: LevelCurve::default(),
        }
    }

    /// Preset for `mode`.
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Burst => Self::burst(),
            GameMode::Drop => Self::drop(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_cascade_delay(mut self, ms: u32) -> Self {
        self.cascade_delay_ms = ms;
        self
    }

    /// Reject configurations a game cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.token_kinds == 0 {
            return Err(ConfigError::EmptyAlphabet);
        }
        if self.token_kinds > MAX_TOKEN_KINDS {
            return Err(ConfigError::AlphabetTooLarge {
                kinds: self.token_kinds,
                max: MAX_TOKEN_KINDS,
            });
        }
        if self.min_cluster < 2 {
            return Err(ConfigError::MinClusterTooSmall(self.min_cluster));
        }
        if self.refill && self.token_kinds < 2 {
            return Err(ConfigError::RefillNeedsTwoKinds(self.token_kinds));
        }
        self.level_curve.validate()
    }
}
