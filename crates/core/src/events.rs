//! Event module - notifications from the engine to its presentation
//!
//! The engine never calls into UI code. It pushes [`GameEvent`] values into an
//! [`EventSink`]; the caller drains them and either matches on them directly or
//! forwards them to an [`Observer`].

use std::collections::VecDeque;

use crate::types::{Coord, Token};

/// Something observable happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// One cascade pass removed these cells (row-major per cluster).
    CellsRemoved {
        cells: Vec<Coord>,
        cluster_sizes: Vec<usize>,
        /// Combo index the pass was scored with (0 for the first pass).
        combo: u32,
        /// Points awarded for the pass after the level multiplier.
        points: u64,
    },
    ScoreChanged {
        score: u64,
    },
    LevelChanged {
        level: u32,
    },
    /// The cascade settled. `combo` is the number of passes it took.
    CascadeComplete {
        combo: u32,
        total_points: u64,
    },
    /// No qualifying cluster is left on the board.
    NoMovesLeft,
    /// The board was rearranged after running out of moves.
    BoardShuffled {
        attempts: u32,
        /// True when shuffling gave up and the board was filled afresh.
        refilled: bool,
    },
    /// Drop mode: the falling token came to rest.
    PieceLocked {
        at: Coord,
        token: Token,
    },
    GameOver {
        score: u64,
    },
    Reset {
        episode_id: u32,
    },
}

/// Receives events as the engine produces them.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl EventSink for VecDeque<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push_back(event);
    }
}

/// Discards everything.
impl EventSink for () {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Listener with one hook per notification; every hook defaults to a no-op.
pub trait Observer {
    fn on_cells_removed(&mut self, _cells: &[Coord], _cluster_sizes: &[usize]) {}
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_level_changed(&mut self, _level: u32) {}
    fn on_cascade_complete(&mut self, _combo: u32, _total_points: u64) {}
    fn on_no_moves(&mut self) {}
    fn on_board_shuffled(&mut self, _refilled: bool) {}
    fn on_piece_locked(&mut self, _at: Coord, _token: Token) {}
    fn on_game_over(&mut self, _score: u64) {}
    fn on_reset(&mut self, _episode_id: u32) {}
}

impl GameEvent {
    /// Invoke the matching [`Observer`] hook.
    pub fn dispatch<O: Observer + ?Sized>(&self, observer: &mut O) {
        match self {
            GameEvent::CellsRemoved {
                cells,
                cluster_sizes,
                ..
            } => observer.on_cells_removed(cells, cluster_sizes),
            GameEvent::ScoreChanged { score } => observer.on_score_changed(*score),
            GameEvent::LevelChanged { level } => observer.on_level_changed(*level),
            GameEvent::CascadeComplete {
                combo,
                total_points,
            } => observer.on_cascade_complete(*combo, *total_points),
            GameEvent::NoMovesLeft => observer.on_no_moves(),
            GameEvent::BoardShuffled { refilled, .. } => observer.on_board_shuffled(*refilled),
            GameEvent::PieceLocked { at, token } => observer.on_piece_locked(*at, *token),
            GameEvent::GameOver { score } => observer.on_game_over(*score),
            GameEvent::Reset { episode_id } => observer.on_reset(*episode_id),
        }
    }
}
