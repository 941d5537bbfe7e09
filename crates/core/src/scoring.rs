//! Scoring module - pass points, level curve and the score tracker
//!
//! Two point rules exist, one per game mode:
//! - **Combo** (burst mode): `Σ size × base × (combo + 1)`. Later passes of a
//!   chain reaction are worth more.
//! - **BoardScan** (drop mode): `Σ size × per_token + clusters × cluster_bonus +
//!   Σ overflow × overflow_bonus`, where overflow is how far a cluster exceeds the
//!   minimum size.
//!
//! Raw pass points then go through [`ScoreTracker::add_score`], which applies the
//! level multiplier and handles level ups.
//!
//! All arithmetic saturates; a score never wraps. Levels stop at
//! [`LevelCurve::max_level`], which bounds both the multiplier and the number of
//! level ups a single call can trigger.

use tracing::info;

use crate::error::ConfigError;
use crate::events::{EventSink, GameEvent};
use crate::types::{
    BASE_POINTS, CLUSTER_BONUS, LEVEL_THRESHOLD_GROWTH, LEVEL_THRESHOLD_STEP, MAX_LEVEL,
    MULTIPLIER_STEP_PERMILLE, OVERFLOW_BONUS, PER_TOKEN_POINTS, PERMILLE,
};

/// How a resolution pass is turned into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringRule {
    Combo {
        base_points: u32,
    },
    BoardScan {
        per_token: u32,
        cluster_bonus: u32,
        overflow_bonus: u32,
    },
}

impl ScoringRule {
    /// Combo rule with the default base.
    pub const fn combo() -> Self {
        ScoringRule::Combo {
            base_points: BASE_POINTS,
        }
    }

    /// Board-scan rule with the default bonuses.
    pub const fn board_scan() -> Self {
        ScoringRule::BoardScan {
            per_token: PER_TOKEN_POINTS,
            cluster_bonus: CLUSTER_BONUS,
            overflow_bonus: OVERFLOW_BONUS,
        }
    }

    /// Raw points for one pass, before the level multiplier.
    pub fn pass_points(&self, sizes: &[usize], combo: u32, min_cluster: usize) -> u64 {
        match *self {
            ScoringRule::Combo { base_points } => calculate_combo_points(sizes, base_points, combo),
            ScoringRule::BoardScan {
                per_token,
                cluster_bonus,
                overflow_bonus,
            } => calculate_board_scan_points(
                sizes,
                min_cluster,
                per_token,
                cluster_bonus,
                overflow_bonus,
            ),
        }
    }
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self::combo()
    }
}

/// Combo rule: every cleared token is worth `base × (combo + 1)`.
///
/// ```
/// use autumn_burst_core::scoring::calculate_combo_points;
///
/// assert_eq!(calculate_combo_points(&[4], 10, 0), 40);
/// assert_eq!(calculate_combo_points(&[4, 5], 10, 1), 180);
/// ```
pub fn calculate_combo_points(sizes: &[usize], base_points: u32, combo: u32) -> u64 {
    let factor = u64::from(combo).saturating_add(1);
    sizes
        .iter()
        .map(|&size| {
            (size as u64)
                .saturating_mul(u64::from(base_points))
                .saturating_mul(factor)
        })
        .fold(0u64, u64::saturating_add)
}

/// Board-scan rule: per-token points, a flat bonus per cluster, and a bonus for
/// every token past the minimum cluster size.
pub fn calculate_board_scan_points(
    sizes: &[usize],
    min_cluster: usize,
    per_token: u32,
    cluster_bonus: u32,
    overflow_bonus: u32,
) -> u64 {
    sizes
        .iter()
        .map(|&size| {
            let overflow = size.saturating_sub(min_cluster) as u64;
            (size as u64)
                .saturating_mul(u64::from(per_token))
                .saturating_add(u64::from(cluster_bonus))
                .saturating_add(overflow.saturating_mul(u64::from(overflow_bonus)))
        })
        .fold(0u64, u64::saturating_add)
}

/// Level thresholds and multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelCurve {
    /// Linear threshold term per level.
    pub step: u64,
    /// Extra threshold per level past the first.
    pub growth: u64,
    /// Multiplier gained per level, per-mille.
    pub multiplier_step_permille: u64,
    /// Last level; reaching it ends level progression.
    pub max_level: u32,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            step: LEVEL_THRESHOLD_STEP,
            growth: LEVEL_THRESHOLD_GROWTH,
            multiplier_step_permille: MULTIPLIER_STEP_PERMILLE,
            max_level: MAX_LEVEL,
        }
    }
}

impl LevelCurve {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step == 0 {
            return Err(ConfigError::FlatLevelCurve);
        }
        if self.max_level == 0 {
            return Err(ConfigError::NoLevels);
        }
        Ok(())
    }

    /// Score at which `level` is left: `level × step + (level − 1) × growth`.
    /// Level 0 maps to 0 (the start of level 1).
    pub fn threshold(&self, level: u32) -> u64 {
        let level = u64::from(level);
        level
            .saturating_mul(self.step)
            .saturating_add(level.saturating_sub(1).saturating_mul(self.growth))
    }

    /// Multiplier at `level`, per-mille: `1000 + (level − 1) × step`.
    pub fn multiplier_permille(&self, level: u32) -> u64 {
        PERMILLE.saturating_add(
            u64::from(level.saturating_sub(1)).saturating_mul(self.multiplier_step_permille),
        )
    }
}

/// Outcome of one [`ScoreTracker::add_score`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreUpdate {
    /// Points actually added (after the multiplier, floored).
    pub awarded: u64,
    pub score: u64,
    pub levels_gained: u32,
}

/// Score, level and progression state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u64,
    level: u32,
    threshold: u64,
    multiplier_permille: u64,
    curve: LevelCurve,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new(LevelCurve::default())
    }
}

impl ScoreTracker {
    pub fn new(curve: LevelCurve) -> Self {
        Self {
            score: 0,
            level: 1,
            threshold: curve.threshold(1),
            multiplier_permille: curve.multiplier_permille(1),
            curve,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Score needed to leave the current level.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn multiplier_permille(&self) -> u64 {
        self.multiplier_permille
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Add `points × multiplier` and level up as many times as the new score allows.
    pub fn add_score(&mut self, points: u64, sink: &mut dyn EventSink) -> ScoreUpdate {
        let awarded = apply_multiplier(points, self.multiplier_permille);
        self.score = self.score.saturating_add(awarded);
        sink.emit(GameEvent::ScoreChanged { score: self.score });

        let mut levels_gained = 0;
        while !self.at_max_level() && self.score >= self.threshold {
            self.level_up(sink);
            levels_gained += 1;
        }

        ScoreUpdate {
            awarded,
            score: self.score,
            levels_gained,
        }
    }

    pub fn at_max_level(&self) -> bool {
        self.level >= self.curve.max_level
    }

    /// Advance one level and recompute threshold and multiplier.
    ///
    /// Does nothing at the level cap.
    pub fn level_up(&mut self, sink: &mut dyn EventSink) {
        if self.at_max_level() {
            return;
        }
        self.level += 1;
        self.threshold = self.curve.threshold(self.level);
        self.multiplier_permille = self.curve.multiplier_permille(self.level);
        info!(level = self.level, threshold = self.threshold, "level up");
        sink.emit(GameEvent::LevelChanged { level: self.level });
    }

    /// Back to score 0, level 1.
    pub fn reset(&mut self, sink: &mut dyn EventSink) {
        *self = Self::new(self.curve);
        sink.emit(GameEvent::ScoreChanged { score: 0 });
        sink.emit(GameEvent::LevelChanged { level: 1 });
    }

    /// Fraction of the way from the previous threshold to the current one, in `[0, 1]`.
    /// Always 1 at the level cap.
    pub fn progress_to_next_level(&self) -> f32 {
        if self.at_max_level() {
            return 1.0;
        }
        let start = self.curve.threshold(self.level - 1);
        let span = self.threshold.saturating_sub(start);
        if span == 0 {
            return 1.0;
        }
        let progress = self.score.saturating_sub(start) as f64 / span as f64;
        progress.clamp(0.0, 1.0) as f32
    }
}

/// `points × permille / 1000`, floored.
pub fn apply_multiplier(points: u64, multiplier_permille: u64) -> u64 {
    let scaled = u128::from(points) * u128::from(multiplier_permille) / u128::from(PERMILLE);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_points_scale_with_pass() {
        assert_eq!(calculate_combo_points(&[4], 10, 0), 40);
        assert_eq!(calculate_combo_points(&[4], 10, 1), 80);
        assert_eq!(calculate_combo_points(&[4, 6], 10, 2), 300);
        assert_eq!(calculate_combo_points(&[], 10, 5), 0);
    }

    #[test]
    fn test_board_scan_points() {
        // 4 cells: 40 + 50 bonus, no overflow
        assert_eq!(calculate_board_scan_points(&[4], 4, 10, 50, 20), 90);
        // 6 cells: 60 + 50 + 2 * 20
        assert_eq!(calculate_board_scan_points(&[6], 4, 10, 50, 20), 150);
        assert_eq!(calculate_board_scan_points(&[4, 6], 4, 10, 50, 20), 240);
    }

    #[test]
    fn test_rule_dispatch() {
        assert_eq!(ScoringRule::combo().pass_points(&[5], 1, 4), 100);
        assert_eq!(ScoringRule::board_scan().pass_points(&[5], 3, 4), 120);
    }

    #[test]
    fn test_points_saturate() {
        assert_eq!(calculate_combo_points(&[usize::MAX], u32::MAX, u32::MAX), u64::MAX);
    }

    #[test]
    fn test_level_curve_defaults() {
        let curve = LevelCurve::default();
        assert_eq!(curve.threshold(0), 0);
        assert_eq!(curve.threshold(1), 1000);
        assert_eq!(curve.threshold(2), 2500);
        assert_eq!(curve.threshold(3), 4000);
        assert_eq!(curve.multiplier_permille(1), 1000);
        assert_eq!(curve.multiplier_permille(3), 1200);
        assert!(curve.validate().is_ok());
        let flat = LevelCurve {
            step: 0,
            ..curve
        };
        assert_eq!(flat.validate(), Err(ConfigError::FlatLevelCurve));
    }

    #[test]
    fn test_add_score_emits_and_accumulates() {
        let mut tracker = ScoreTracker::default();
        let mut events = Vec::new();
        let update = tracker.add_score(40, &mut events);
        assert_eq!(update.awarded, 40);
        assert_eq!(tracker.score(), 40);
        assert_eq!(events, vec![GameEvent::ScoreChanged { score: 40 }]);
    }

    #[test]
    fn test_large_jump_crosses_several_levels() {
        let mut tracker = ScoreTracker::default();
        let mut events = Vec::new();
        let update = tracker.add_score(5000, &mut events);
        assert_eq!(tracker.level(), 4);
        assert_eq!(update.levels_gained, 3);
        assert_eq!(tracker.threshold(), 5500);
        assert_eq!(
            &events[1..],
            &[
                GameEvent::LevelChanged { level: 2 },
                GameEvent::LevelChanged { level: 3 },
                GameEvent::LevelChanged { level: 4 },
            ]
        );
    }

    #[test]
    fn test_multiplier_floors_awarded_points() {
        let mut tracker = ScoreTracker::default();
        tracker.add_score(1000, &mut ());
        assert_eq!(tracker.level(), 2);
        assert_eq!(tracker.multiplier_permille(), 1100);
        // 15 * 1.1 = 16.5 -> 16
        let update = tracker.add_score(15, &mut ());
        assert_eq!(update.awarded, 16);
        assert_eq!(tracker.score(), 1016);
    }

    #[test]
    fn test_progress_to_next_level() {
        let mut tracker = ScoreTracker::default();
        assert_eq!(tracker.progress_to_next_level(), 0.0);
        tracker.add_score(500, &mut ());
        assert!((tracker.progress_to_next_level() - 0.5).abs() < 1e-6);
        tracker.add_score(500, &mut ());
        // Level 2 spans 1000..2500.
        assert_eq!(tracker.level(), 2);
        assert_eq!(tracker.progress_to_next_level(), 0.0);
    }

    #[test]
    fn test_level_up_stops_at_cap() {
        let curve = LevelCurve {
            max_level: 2,
            ..LevelCurve::default()
        };
        let mut tracker = ScoreTracker::new(curve);
        let mut events = Vec::new();
        tracker.add_score(10_000, &mut events);
        assert_eq!(tracker.level(), 2);
        assert!(tracker.at_max_level());
        assert_eq!(tracker.progress_to_next_level(), 1.0);

        tracker.level_up(&mut events);
        assert_eq!(tracker.level(), 2);
        assert_eq!(events.len(), 2);

        let zero = LevelCurve {
            max_level: 0,
            ..LevelCurve::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::NoLevels));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut tracker = ScoreTracker::default();
        tracker.add_score(5000, &mut ());
        let mut events = Vec::new();
        tracker.reset(&mut events);
        assert_eq!(tracker, ScoreTracker::default());
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged { score: 0 },
                GameEvent::LevelChanged { level: 1 }
            ]
        );
    }
}
