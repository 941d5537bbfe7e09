//! Core engine - pure, deterministic, and testable
//!
//! This crate contains the matching rules, cascade resolution and game state.
//! It has **no dependencies** on UI or I/O, making it:
//!
//! - **Deterministic**: Same seed and inputs produce identical games
//! - **Testable**: Every rule is covered by unit tests next to the code
//! - **Portable**: Runs in a terminal, behind a GUI, or headless
//!
//! # Module Structure
//!
//! - [`grid`]: W x H board of optional tokens with bounds-checked access
//! - [`cluster`]: iterative flood fill over equal tokens
//! - [`gravity`]: per-column collapse and refill
//! - [`resolver`]: cascade state machine (remove, score, settle, rescan)
//! - [`scoring`]: pass points, level curve and [`ScoreTracker`]
//! - [`rng`]: token sources (seeded LCG and scripted)
//! - [`piece`]: falling token and preview queue for drop mode
//! - [`events`]: notifications and the [`Observer`] trait
//! - [`game`]: the [`Game`] facade owning all of the above
//!
//! # Game Rules
//!
//! - **Clusters**: orthogonally connected cells holding the same token
//! - **Burst**: a cluster of at least 4 cells is removed when activated
//! - **Gravity**: tokens above removed cells fall; burst mode refills from the top
//! - **Cascade**: after every pass the whole board is rescanned, and any new
//!   qualifying cluster is removed in the next pass with a higher combo
//! - **Levels**: thresholds 1000, 2500, 4000, ...; each level adds 10% to points
//!
//! # Example
//!
//! ```
//! use autumn_burst_core::{Activation, EngineConfig, Game, Grid, ScriptedTokens};
//!
//! let grid: Grid = "AAB\nAAC\nDEF".parse().unwrap();
//! let config = EngineConfig::burst().with_cascade_delay(0);
//! let mut game = Game::from_grid(config, grid, ScriptedTokens::from_letters("GH")).unwrap();
//!
//! assert_eq!(game.activate(0, 0).unwrap(), Activation::Started { size: 4 });
//! assert_eq!(game.score(), 40);
//! assert!(game.grid().is_full());
//! ```
//!
//! # Timing
//!
//! The engine never reads a clock. [`Game::tick`] takes elapsed logical
//! milliseconds:
//! - **Cascade passes**: spaced by `cascade_delay_ms` (400ms by default)
//! - **Drop gravity**: 1000ms at level 1, shrinking per level to a 120ms floor

pub mod cluster;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod gravity;
pub mod grid;
pub mod piece;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use autumn_burst_types as types;

// Re-export commonly used types for convenience
pub use cluster::{find_all_clusters, find_cluster, has_qualifying_cluster, Cluster};
pub use config::EngineConfig;
pub use error::{ConfigError, EngineError, GridParseError};
pub use events::{EventSink, GameEvent, Observer};
pub use game::Game;
pub use gravity::{collapse_column, settle, ColumnSettle};
pub use grid::Grid;
pub use piece::{FallingToken, NextQueue};
pub use resolver::{
    Activation, CascadeResult, CascadeStep, IgnoreReason, MatchResolver, ResolverState,
};
pub use rng::{ScriptedTokens, SeededTokens, SimpleRng, TokenSource};
pub use scoring::{LevelCurve, ScoreTracker, ScoreUpdate, ScoringRule};
pub use snapshot::{FallingSnapshot, GameSnapshot};
