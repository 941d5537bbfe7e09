//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It renders into a
//! plain framebuffer that is flushed to the terminal with diffing, instead of
//! going through a widget toolkit.
//!
//! - [`board_view`]: pure snapshot to framebuffer mapping, plus mouse hit testing
//! - [`flash`]: event-driven highlight of removed cells and banners
//! - [`renderer`]: crossterm backend

pub mod board_view;
pub mod fb;
pub mod flash;
pub mod renderer;

pub use autumn_burst_core as core;
pub use autumn_burst_types as types;

pub use board_view::{token_color, AnchorY, BoardLayout, BoardView, Decorations, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use flash::BurstFlash;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
