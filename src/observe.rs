//! Event logging for the terminal binary.

use tracing::{debug, info};

use crate::core::Observer;
use crate::types::{Coord, Token};

/// Writes engine notifications to the `tracing` log and keeps a few totals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub cells_removed: u64,
    pub cascades: u32,
    pub best_combo: u32,
    pub shuffles: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for EventLog {
    fn on_cells_removed(&mut self, cells: &[Coord], cluster_sizes: &[usize]) {
        self.cells_removed += cells.len() as u64;
        debug!(cells = cells.len(), clusters = ?cluster_sizes, "cells removed");
    }

    fn on_level_changed(&mut self, level: u32) {
        info!(level, "level changed");
    }

    fn on_cascade_complete(&mut self, combo: u32, total_points: u64) {
        self.cascades += 1;
        self.best_combo = self.best_combo.max(combo);
        debug!(combo, total_points, "cascade complete");
    }

    fn on_board_shuffled(&mut self, refilled: bool) {
        self.shuffles += 1;
        info!(refilled, "board shuffled");
    }

    fn on_piece_locked(&mut self, at: Coord, token: Token) {
        debug!(row = at.row, col = at.col, %token, "token locked");
    }

    fn on_game_over(&mut self, score: u64) {
        info!(score, cascades = self.cascades, best_combo = self.best_combo, "game over");
    }

    fn on_reset(&mut self, episode_id: u32) {
        info!(episode_id, removed = self.cells_removed, "new episode");
        *self = Self::default();
    }
}
