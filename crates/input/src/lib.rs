//! Terminal input module.
//!
//! This crate is independent of any UI framework. It maps `crossterm` key and
//! mouse events into [`Command`]s for the game loop. What a key means depends on
//! the game mode: in burst mode the arrows move a selection cursor, in drop mode
//! they steer the falling token.

pub mod map;

pub use autumn_burst_types as types;

pub use map::{map_key, map_mouse, should_quit, Command};
