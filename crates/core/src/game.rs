//! Game module - owns one play session
//!
//! [`Game`] ties the board, resolver, score tracker and token source together
//! and exposes the operations a front end needs: `activate` for click-to-burst,
//! `apply_action` and `tick` for the falling-token variant, explicit cascade
//! stepping, `reset`, queries, and the event queue.
//!
//! Time is logical. Callers pass elapsed milliseconds to [`Game::tick`]; the game
//! never reads a clock, so any frame rate gives the same results.

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};

use crate::cluster::has_qualifying_cluster;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EventSink, GameEvent, Observer};
use crate::grid::Grid;
use crate::piece::{drop_interval_ms, spawn_coord, FallingToken, NextQueue};
use crate::resolver::{Activation, CascadeStep, IgnoreReason, MatchResolver, ResolverState};
use crate::rng::{SeededTokens, TokenSource};
use crate::scoring::ScoreTracker;
use crate::snapshot::{FallingSnapshot, GameSnapshot};
use crate::types::{Coord, GameAction, GameMode, Token, NEXT_QUEUE_LEN, SHUFFLE_ATTEMPTS};

/// One game: board, score and everything in between.
#[derive(Debug, Clone)]
pub struct Game<S: TokenSource = SeededTokens> {
    config: EngineConfig,
    grid: Grid,
    tokens: S,
    resolver: MatchResolver,
    tracker: ScoreTracker,
    events: VecDeque<GameEvent>,

    // Drop mode
    falling: Option<FallingToken>,
    next: Option<NextQueue>,
    drop_timer_ms: u32,

    /// Time since the last cascade pass.
    cascade_timer_ms: u32,
    paused: bool,
    game_over: bool,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
}

impl Game<SeededTokens> {
    /// Start a game with tokens drawn from `config.seed`.
    ///
    /// ```
    /// use autumn_burst_core::{EngineConfig, Game};
    ///
    /// let game = Game::new(EngineConfig::burst().with_seed(7)).unwrap();
    /// assert_eq!((game.width(), game.height()), (8, 8));
    /// assert_eq!(game.score(), 0);
    /// assert_eq!(game.level(), 1);
    /// ```
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_source(config, SeededTokens::new(config.seed))
    }
}

impl<S: TokenSource> Game<S> {
    /// Start a game drawing tokens from `tokens`.
    pub fn with_source(config: EngineConfig, tokens: S) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height)?;
        let mut game = Self::assemble(config, grid, tokens);
        game.populate();
        Ok(game)
    }

    /// Start from an existing board. The board's dimensions override the
    /// configured ones and nothing is filled; drop mode still spawns its token.
    pub fn from_grid(mut config: EngineConfig, grid: Grid, tokens: S) -> Result<Self, EngineError> {
        config.width = grid.width();
        config.height = grid.height();
        config.validate()?;
        let mut game = Self::assemble(config, grid, tokens);
        if config.mode == GameMode::Drop {
            game.next = Some(NextQueue::new(&mut game.tokens, config.token_kinds));
            game.spawn_next();
        }
        Ok(game)
    }

    fn assemble(config: EngineConfig, grid: Grid, tokens: S) -> Self {
        Self {
            resolver: MatchResolver::new(&config),
            tracker: ScoreTracker::new(config.level_curve),
            config,
            grid,
            tokens,
            events: VecDeque::new(),
            falling: None,
            next: None,
            drop_timer_ms: 0,
            cascade_timer_ms: 0,
            paused: false,
            game_over: false,
            episode_id: 0,
        }
    }

    /// Fresh board for a new episode.
    fn populate(&mut self) {
        let kinds = self.config.token_kinds;
        match self.config.mode {
            GameMode::Burst => {
                if self.config.avoid_initial_clusters {
                    self.grid
                        .fill_without_clusters(&mut self.tokens, kinds, self.config.min_cluster);
                } else {
                    self.grid.clear();
                    self.grid.fill_from(&mut self.tokens, kinds);
                    if self.config.shuffle_when_stuck && !self.has_available_move() {
                        self.shuffle_board();
                    }
                }
            }
            GameMode::Drop => {
                self.grid.clear();
                self.next = Some(NextQueue::new(&mut self.tokens, kinds));
                self.spawn_next();
            }
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Token at (row, col); `Ok(None)` for an empty cell.
    pub fn token_at(&self, row: usize, col: usize) -> Result<Option<Token>, EngineError> {
        self.grid
            .get(row, col)
            .ok_or_else(|| self.grid.out_of_bounds(row, col))
    }

    pub fn score(&self) -> u64 {
        self.tracker.score()
    }

    pub fn level(&self) -> u32 {
        self.tracker.level()
    }

    pub fn tracker(&self) -> &ScoreTracker {
        &self.tracker
    }

    /// Passes already taken in the running cascade.
    pub fn combo(&self) -> u32 {
        self.resolver.combo()
    }

    pub fn resolver_state(&self) -> ResolverState {
        self.resolver.state()
    }

    pub fn is_resolving(&self) -> bool {
        self.resolver.is_resolving()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn falling(&self) -> Option<FallingToken> {
        self.falling
    }

    /// Drop-mode preview, next token first.
    pub fn next_tokens(&self) -> Option<&[Token; NEXT_QUEUE_LEN]> {
        self.next.as_ref().map(NextQueue::peek)
    }

    pub fn token_source(&self) -> &S {
        &self.tokens
    }

    /// Current drop-mode gravity interval.
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level())
    }

    /// Whether the player can still do something useful.
    ///
    /// Burst mode needs a qualifying cluster on the board; drop mode only needs
    /// the game to be running.
    pub fn has_available_move(&self) -> bool {
        match self.config.mode {
            GameMode::Burst => has_qualifying_cluster(&self.grid, self.config.min_cluster),
            GameMode::Drop => !self.game_over,
        }
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Drain the queue into an observer.
    pub fn dispatch_events<O: Observer + ?Sized>(&mut self, observer: &mut O) {
        for event in self.events.drain(..) {
            event.dispatch(observer);
        }
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Burst the cluster at (row, col).
    ///
    /// When a cascade starts, its first pass runs before this returns. With a
    /// zero cascade delay the whole cascade does.
    pub fn activate(&mut self, row: usize, col: usize) -> Result<Activation, EngineError> {
        if !self.grid.in_bounds(row, col) {
            return Err(self.grid.out_of_bounds(row, col));
        }
        if self.paused || self.game_over {
            return Ok(Activation::Ignored(IgnoreReason::Inactive));
        }

        let activation = self.resolver.activate(&self.grid, row, col)?;
        if activation.started() {
            self.cascade_timer_ms = 0;
            self.run_pass();
            if self.config.cascade_delay_ms == 0 {
                self.drain_cascade();
            }
        }
        Ok(activation)
    }

    /// Apply a game action. Returns whether it changed anything.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
                return true;
            }
            GameAction::Restart => {
                self.reset();
                return true;
            }
            _ => {}
        }

        if self.paused || self.game_over || self.resolver.is_resolving() {
            return false;
        }
        let Some(falling) = self.falling else {
            return false;
        };

        match action {
            GameAction::MoveLeft => self.shift_falling(falling, 0, -1),
            GameAction::MoveRight => self.shift_falling(falling, 0, 1),
            GameAction::SoftDrop => {
                let moved = self.shift_falling(falling, 1, 0);
                if moved {
                    self.drop_timer_ms = 0;
                }
                moved
            }
            GameAction::HardDrop => {
                let row = falling.landing_row(&self.grid);
                self.falling = Some(FallingToken {
                    at: Coord::new(row, falling.at.col),
                    ..falling
                });
                self.lock_falling();
                true
            }
            GameAction::Pause | GameAction::Restart => false,
        }
    }

    fn shift_falling(&mut self, falling: FallingToken, d_row: isize, d_col: isize) -> bool {
        match falling.shifted(&self.grid, d_row, d_col) {
            Some(at) => {
                self.falling = Some(FallingToken { at, ..falling });
                true
            }
            None => false,
        }
    }

    /// Advance logical time. Returns whether anything moved.
    ///
    /// While a cascade runs, passes are spaced `cascade_delay_ms` apart; otherwise
    /// drop mode lowers the falling token once per drop interval and locks it when
    /// it cannot fall further.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.resolver.is_resolving() {
            self.tick_cascade(elapsed_ms)
        } else {
            self.tick_drop(elapsed_ms)
        }
    }

    fn is_active(&self) -> bool {
        !self.paused && !self.game_over
    }

    fn tick_cascade(&mut self, elapsed_ms: u32) -> bool {
        let delay = self.config.cascade_delay_ms;
        if delay == 0 {
            return !self.drain_cascade().is_empty();
        }
        self.cascade_timer_ms = self.cascade_timer_ms.saturating_add(elapsed_ms);
        let mut progressed = false;
        while self.resolver.is_resolving() && self.cascade_timer_ms >= delay {
            self.cascade_timer_ms -= delay;
            progressed |= self.run_pass().is_some();
        }
        progressed
    }

    /// Lower the falling token once per elapsed drop interval, carrying the
    /// remainder, so one long tick and many short ones end in the same place.
    fn tick_drop(&mut self, elapsed_ms: u32) -> bool {
        if self.falling.is_none() {
            return false;
        }
        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);

        let mut moved = false;
        while let Some(falling) = self.falling {
            let interval = self.drop_interval_ms();
            if self.drop_timer_ms < interval {
                break;
            }
            self.drop_timer_ms -= interval;
            moved = true;
            if !falling.is_grounded(&self.grid) {
                self.shift_falling(falling, 1, 0);
                continue;
            }

            let leftover = self.drop_timer_ms;
            self.lock_falling();
            if self.resolver.is_resolving() {
                // The rest of the tick paces the cascade.
                self.tick_cascade(leftover);
                break;
            }
            self.drop_timer_ms = leftover;
        }
        moved
    }

    /// Run exactly one cascade pass, if one is pending.
    ///
    /// Paused or finished games do not advance.
    pub fn step(&mut self) -> Option<CascadeStep> {
        if !self.is_active() {
            return None;
        }
        self.cascade_timer_ms = 0;
        self.run_pass()
    }

    /// Run the pending cascade to completion. Does nothing while paused.
    pub fn resolve_all(&mut self) -> Vec<CascadeStep> {
        if !self.is_active() {
            return Vec::new();
        }
        self.drain_cascade()
    }

    fn drain_cascade(&mut self) -> Vec<CascadeStep> {
        let mut steps = Vec::new();
        while let Some(step) = self.run_pass() {
            steps.push(step);
        }
        self.cascade_timer_ms = 0;
        steps
    }

    /// [`step`](Self::step), but only if `episode_id` is still current.
    ///
    /// A continuation scheduled before a reset carries the old id and does nothing.
    pub fn continue_cascade(&mut self, episode_id: u32) -> Option<CascadeStep> {
        if episode_id != self.episode_id {
            trace!(
                stale = episode_id,
                current = self.episode_id,
                "stale cascade continuation dropped"
            );
            return None;
        }
        self.step()
    }

    fn run_pass(&mut self) -> Option<CascadeStep> {
        let step = self.resolver.step(
            &mut self.grid,
            &mut self.tokens,
            &mut self.tracker,
            &mut self.events,
        )?;
        if step.done {
            self.after_cascade();
        }
        Some(step)
    }

    fn after_cascade(&mut self) {
        match self.config.mode {
            GameMode::Burst => {
                if !self.has_available_move() {
                    info!("no moves left");
                    self.events.emit(GameEvent::NoMovesLeft);
                    if self.config.shuffle_when_stuck {
                        self.shuffle_board();
                    }
                }
            }
            GameMode::Drop => self.spawn_next(),
        }
    }

    /// Rearrange the board until it has a move, falling back to fresh fills.
    fn shuffle_board(&mut self) {
        let kinds = self.config.token_kinds;
        let min = self.config.min_cluster;
        let mut attempts = 0;
        let mut refilled = false;
        let mut solved = false;

        while attempts < SHUFFLE_ATTEMPTS && !solved {
            attempts += 1;
            self.tokens.shuffle(self.grid.cells_mut());
            solved = has_qualifying_cluster(&self.grid, min);
        }
        let mut fills = 0;
        while fills < SHUFFLE_ATTEMPTS && !solved {
            fills += 1;
            refilled = true;
            self.grid.clear();
            self.grid.fill_from(&mut self.tokens, kinds);
            solved = has_qualifying_cluster(&self.grid, min);
        }

        if solved {
            info!(attempts, refilled, "board shuffled");
        } else {
            warn!(attempts, fills, "board still has no move after shuffling");
        }
        self.events.emit(GameEvent::BoardShuffled { attempts, refilled });
    }

    fn spawn_next(&mut self) {
        self.falling = None;
        self.drop_timer_ms = 0;
        if self.next.is_none() {
            return;
        }

        let at = spawn_coord(&self.grid);
        if self.grid.token(at.row, at.col).is_some() {
            self.game_over = true;
            info!(score = self.tracker.score(), "game over");
            self.events.emit(GameEvent::GameOver {
                score: self.tracker.score(),
            });
            return;
        }

        let kinds = self.config.token_kinds;
        if let Some(next) = self.next.as_mut() {
            let token = next.pop(&mut self.tokens, kinds);
            self.falling = Some(FallingToken::spawn(token, &self.grid));
        }
    }

    fn lock_falling(&mut self) {
        let Some(falling) = self.falling.take() else {
            return;
        };
        let at = falling.at;
        if self.grid.set(at.row, at.col, Some(falling.token)).is_err() {
            return;
        }
        self.events.emit(GameEvent::PieceLocked {
            at,
            token: falling.token,
        });

        if self.resolver.begin_scan(&self.grid) {
            self.cascade_timer_ms = 0;
            self.run_pass();
            if self.config.cascade_delay_ms == 0 {
                self.drain_cascade();
            }
        } else {
            self.spawn_next();
        }
    }

    /// Start a new episode: cancel the cascade, clear timers, new board, score 0.
    pub fn reset(&mut self) {
        self.resolver.cancel();
        self.episode_id = self.episode_id.wrapping_add(1);
        self.cascade_timer_ms = 0;
        self.drop_timer_ms = 0;
        self.paused = false;
        self.game_over = false;
        self.falling = None;

        self.events.emit(GameEvent::Reset {
            episode_id: self.episode_id,
        });
        self.tracker.reset(&mut self.events);
        self.populate();
        debug!(episode = self.episode_id, "game reset");
    }

    /// Fill `out`, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.mode = self.config.mode;
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.board.clear();
        out.board.extend(
            self.grid
                .cells()
                .iter()
                .map(|cell| cell.map_or(0, |t| t.index() + 1)),
        );
        out.rehash();
        out.falling = self.falling.map(|f| FallingSnapshot {
            token: f.token,
            at: f.at,
            landing_row: f.landing_row(&self.grid),
        });
        out.next = match self.next_tokens() {
            Some(tokens) => tokens.map(Some),
            None => [None; NEXT_QUEUE_LEN],
        };
        out.score = self.tracker.score();
        out.level = self.tracker.level();
        out.combo = self.resolver.combo();
        out.progress = self.tracker.progress_to_next_level();
        out.resolving = self.resolver.is_resolving();
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.episode_id = self.episode_id;
        out.seed = self.config.seed;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}
