//! Resolver module - the cascade state machine
//!
//! ```text
//!            activate (cluster >= min)          rescan finds clusters
//!   Idle ───────────────────────────▶ Resolving ◀──────────┐
//!    ▲  │                               │  │   step        │
//!    │  │ activate (too small)          │  └───────────────┘
//!    │  ▼                               │ rescan finds nothing
//!    │ AwaitingInput ◀──────────────────┘
//!    └──────────── cancel
//! ```
//!
//! One [`MatchResolver::step`] is one pass: remove queued clusters, score them,
//! let the touched columns settle, then rescan the whole board. The caller
//! decides when the next pass runs, which is how chain reactions are paced
//! without the engine owning a timer.

use tracing::{debug, trace};

use crate::cluster::{find_all_clusters, find_cluster, Cluster};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EventSink, GameEvent};
use crate::gravity::{settle, ColumnSettle};
use crate::grid::Grid;
use crate::rng::TokenSource;
use crate::scoring::{apply_multiplier, ScoreTracker, ScoringRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolverState {
    /// Fresh game or cancelled cascade.
    #[default]
    Idle,
    /// Clusters are queued; [`MatchResolver::step`] has work to do.
    Resolving,
    /// Last input was handled; waiting for the next one.
    AwaitingInput,
}

/// Why an activation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A cascade is in progress.
    Busy,
    EmptyCell,
    /// The game is paused or over.
    Inactive,
}

/// Result of [`MatchResolver::activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Ignored(IgnoreReason),
    /// The cluster is below the minimum; nothing was removed.
    TooSmall { size: usize },
    /// The cluster was queued and a cascade begins.
    Started { size: usize },
}

impl Activation {
    pub fn started(&self) -> bool {
        matches!(self, Activation::Started { .. })
    }
}

/// One resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeResult {
    pub clusters: Vec<Cluster>,
    pub sizes: Vec<usize>,
    /// Raw points before the level multiplier.
    pub points: u64,
    /// Points added to the score.
    pub awarded: u64,
    /// Combo index the pass was scored with.
    pub combo: u32,
}

impl CascadeResult {
    pub fn cleared(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Whether the pass removed anything.
    pub fn matched(&self) -> bool {
        !self.clusters.is_empty()
    }
}

/// [`CascadeResult`] plus what gravity did and whether the cascade is over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeStep {
    pub result: CascadeResult,
    pub settled: Vec<ColumnSettle>,
    pub done: bool,
}

/// Drives removal, scoring and gravity one pass at a time.
#[derive(Debug, Clone)]
pub struct MatchResolver {
    state: ResolverState,
    queue: Vec<Cluster>,
    combo: u32,
    cascade_points: u64,
    min_cluster: usize,
    scoring: ScoringRule,
    refill: bool,
    kinds: u8,
}

impl MatchResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: ResolverState::Idle,
            queue: Vec::new(),
            combo: 0,
            cascade_points: 0,
            min_cluster: config.min_cluster,
            scoring: config.scoring,
            refill: config.refill,
            kinds: config.token_kinds,
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn is_resolving(&self) -> bool {
        self.state == ResolverState::Resolving
    }

    /// Passes already taken in the current cascade.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Clusters the next [`step`](Self::step) will remove.
    pub fn pending(&self) -> &[Cluster] {
        &self.queue
    }

    pub fn min_cluster(&self) -> usize {
        self.min_cluster
    }

    /// Player selected (row, col).
    ///
    /// Out-of-bounds coordinates are an error and change nothing. Everything
    /// else is reported through [`Activation`]; only `Started` touches the queue.
    pub fn activate(&mut self, grid: &Grid, row: usize, col: usize) -> Result<Activation, EngineError> {
        if !grid.in_bounds(row, col) {
            return Err(grid.out_of_bounds(row, col));
        }
        if self.is_resolving() {
            trace!(row, col, "activation ignored: cascade in progress");
            return Ok(Activation::Ignored(IgnoreReason::Busy));
        }

        let cluster = find_cluster(grid, row, col);
        let size = cluster.len();
        if size == 0 {
            trace!(row, col, "activation ignored: empty cell");
            return Ok(Activation::Ignored(IgnoreReason::EmptyCell));
        }
        if size < self.min_cluster {
            trace!(row, col, size, "cluster below minimum");
            self.state = ResolverState::AwaitingInput;
            return Ok(Activation::TooSmall { size });
        }

        self.begin(vec![cluster]);
        Ok(Activation::Started { size })
    }

    /// Queue every qualifying cluster on the board.
    ///
    /// Returns whether a cascade started. Does nothing while already resolving.
    pub fn begin_scan(&mut self, grid: &Grid) -> bool {
        if self.is_resolving() {
            return false;
        }
        let clusters = find_all_clusters(grid, self.min_cluster);
        if clusters.is_empty() {
            self.state = ResolverState::AwaitingInput;
            return false;
        }
        self.begin(clusters);
        true
    }

    fn begin(&mut self, clusters: Vec<Cluster>) {
        self.queue = clusters;
        self.combo = 0;
        self.cascade_points = 0;
        self.state = ResolverState::Resolving;
    }

    /// Run one pass. Returns `None` when there is nothing to resolve.
    pub fn step(
        &mut self,
        grid: &mut Grid,
        tokens: &mut dyn TokenSource,
        tracker: &mut ScoreTracker,
        sink: &mut dyn EventSink,
    ) -> Option<CascadeStep> {
        if !self.is_resolving() {
            return None;
        }

        let clusters = std::mem::take(&mut self.queue);
        let sizes: Vec<usize> = clusters.iter().map(Vec::len).collect();
        let cells: Vec<_> = clusters.iter().flatten().copied().collect();
        grid.remove(&cells);

        let combo = self.combo;
        let points = self.scoring.pass_points(&sizes, combo, self.min_cluster);
        let awarded = apply_multiplier(points, tracker.multiplier_permille());
        sink.emit(GameEvent::CellsRemoved {
            cells: cells.clone(),
            cluster_sizes: sizes.clone(),
            combo,
            points: awarded,
        });
        tracker.add_score(points, sink);

        let mut columns: Vec<usize> = cells.iter().map(|c| c.col).collect();
        columns.sort_unstable();
        columns.dedup();
        let refill = if self.refill { Some(tokens) } else { None };
        let settled = settle(grid, &columns, refill, self.kinds);

        self.combo = self.combo.saturating_add(1);
        self.cascade_points = self.cascade_points.saturating_add(awarded);
        debug!(
            clusters = clusters.len(),
            cleared = cells.len(),
            points,
            awarded,
            combo,
            "cascade pass"
        );

        let next = find_all_clusters(grid, self.min_cluster);
        let done = next.is_empty();
        if done {
            sink.emit(GameEvent::CascadeComplete {
                combo: self.combo,
                total_points: self.cascade_points,
            });
            debug!(combo = self.combo, total = self.cascade_points, "cascade complete");
            self.state = ResolverState::AwaitingInput;
            self.combo = 0;
            self.cascade_points = 0;
        } else {
            self.queue = next;
        }

        Some(CascadeStep {
            result: CascadeResult {
                clusters,
                sizes,
                points,
                awarded,
                combo,
            },
            settled,
            done,
        })
    }

    /// Drop any queued work and return to `Idle`.
    pub fn cancel(&mut self) {
        self.queue.clear();
        self.combo = 0;
        self.cascade_points = 0;
        self.state = ResolverState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedTokens;
    use crate::types::Coord;

    fn setup(text: &str, refill: bool) -> (Grid, MatchResolver) {
        let grid: Grid = text.parse().unwrap();
        let config = EngineConfig {
            refill,
            token_kinds: 8,
            ..EngineConfig::burst()
        };
        (grid, MatchResolver::new(&config))
    }

    #[test]
    fn test_initial_state_is_idle() {
        let (_, resolver) = setup("AB", false);
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert_eq!(resolver.combo(), 0);
    }

    #[test]
    fn test_activate_out_of_bounds() {
        let (grid, mut resolver) = setup("AB\nCD", false);
        let err = resolver.activate(&grid, 0, 2).unwrap_err();
        assert!(matches!(err, EngineError::OutOfBounds { col: 2, .. }));
        assert_eq!(resolver.state(), ResolverState::Idle);
    }

    #[test]
    fn test_activate_empty_and_small() {
        let (grid, mut resolver) = setup("A.\nBC", false);
        assert_eq!(
            resolver.activate(&grid, 0, 1).unwrap(),
            Activation::Ignored(IgnoreReason::EmptyCell)
        );
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert_eq!(
            resolver.activate(&grid, 0, 0).unwrap(),
            Activation::TooSmall { size: 1 }
        );
        assert_eq!(resolver.state(), ResolverState::AwaitingInput);
        assert!(resolver.pending().is_empty());
    }

    #[test]
    fn test_single_pass_without_refill() {
        let (mut grid, mut resolver) = setup("AAB\nAAC", false);
        let mut tokens = ScriptedTokens::from_letters("D");
        let mut tracker = ScoreTracker::default();
        let mut events = Vec::new();

        assert_eq!(
            resolver.activate(&grid, 0, 0).unwrap(),
            Activation::Started { size: 4 }
        );
        // Busy while resolving.
        assert_eq!(
            resolver.activate(&grid, 0, 2).unwrap(),
            Activation::Ignored(IgnoreReason::Busy)
        );

        let step = resolver
            .step(&mut grid, &mut tokens, &mut tracker, &mut events)
            .unwrap();
        assert!(step.done);
        assert_eq!(step.result.points, 40);
        assert_eq!(step.result.combo, 0);
        assert_eq!(step.result.cleared(), 4);
        assert!(step.result.matched());
        assert!(!CascadeResult::default().matched());
        assert_eq!(grid.to_string(), "..B\n..C");
        assert_eq!(tracker.score(), 40);
        assert_eq!(resolver.state(), ResolverState::AwaitingInput);
        assert_eq!(tokens.drawn(), 0);
        assert!(events.contains(&GameEvent::CascadeComplete {
            combo: 1,
            total_points: 40
        }));

        assert!(resolver
            .step(&mut grid, &mut tokens, &mut tracker, &mut events)
            .is_none());
    }

    #[test]
    fn test_gravity_triggers_second_pass() {
        // Clearing the B block drops the top A pair onto the bottom A pair.
        let (mut grid, mut resolver) = setup(
            "AAC
             BBD
             BBE
             AAF",
            false,
        );
        let mut tokens = ScriptedTokens::from_letters("G");
        let mut tracker = ScoreTracker::default();
        let mut events = Vec::new();

        resolver.activate(&grid, 1, 0).unwrap();
        let first = resolver
            .step(&mut grid, &mut tokens, &mut tracker, &mut events)
            .unwrap();
        assert!(!first.done);
        assert_eq!(first.result.points, 40);
        assert_eq!(resolver.pending().len(), 1);
        assert_eq!(resolver.combo(), 1);

        let second = resolver
            .step(&mut grid, &mut tokens, &mut tracker, &mut events)
            .unwrap();
        assert!(second.done);
        assert_eq!(second.result.combo, 1);
        assert_eq!(second.result.points, 80);
        assert_eq!(tracker.score(), 120);
        assert_eq!(
            events.last(),
            Some(&GameEvent::CascadeComplete {
                combo: 2,
                total_points: 120
            })
        );
        assert_eq!(resolver.combo(), 0);
    }

    #[test]
    fn test_refill_keeps_board_full() {
        let (mut grid, mut resolver) = setup("AAB\nAAC", true);
        let mut tokens = ScriptedTokens::from_letters("DE");
        let mut tracker = ScoreTracker::default();

        resolver.activate(&grid, 1, 1).unwrap();
        let step = resolver
            .step(&mut grid, &mut tokens, &mut tracker, &mut ())
            .unwrap();
        assert!(grid.is_full());
        assert_eq!(grid.to_string(), "DDB\nEEC");
        assert_eq!(step.settled.len(), 2);
        assert_eq!(step.settled[0].refilled, vec![0, 1]);
    }

    #[test]
    fn test_begin_scan_queues_all_clusters() {
        let (grid, mut resolver) = setup("AAB\nAAB\nCBB", false);
        assert!(resolver.begin_scan(&grid));
        assert_eq!(resolver.pending().len(), 2);
        assert_eq!(resolver.pending()[0][0], Coord::new(0, 0));
        // Not reentrant.
        assert!(!resolver.begin_scan(&grid));
    }

    #[test]
    fn test_cancel_drops_queue() {
        let (grid, mut resolver) = setup("AA\nAA", false);
        resolver.activate(&grid, 0, 0).unwrap();
        resolver.cancel();
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert!(resolver.pending().is_empty());
    }
}
