//! Scoring and level progression

use autumn_burst::core::scoring::apply_multiplier;
use autumn_burst::core::{GameEvent, LevelCurve, ScoreTracker, ScoringRule};
use autumn_burst::types::MAX_LEVEL;

#[test]
fn test_level_thresholds() {
    let curve = LevelCurve::default();
    assert_eq!(curve.threshold(0), 0);
    assert_eq!(curve.threshold(1), 1000);
    assert_eq!(curve.threshold(2), 2500);
    assert_eq!(curve.threshold(3), 4000);
    assert_eq!(curve.threshold(4), 5500);

    assert_eq!(curve.multiplier_permille(1), 1000);
    assert_eq!(curve.multiplier_permille(3), 1200);
}

#[test]
fn test_add_score_crosses_several_levels() {
    let mut tracker = ScoreTracker::default();
    let mut events = Vec::new();
    let update = tracker.add_score(5000, &mut events);

    assert_eq!(update.awarded, 5000);
    assert_eq!(update.levels_gained, 3);
    assert_eq!(tracker.level(), 4);
    assert_eq!(tracker.threshold(), 5500);
    assert_eq!(
        events,
        vec![
            GameEvent::ScoreChanged { score: 5000 },
            GameEvent::LevelChanged { level: 2 },
            GameEvent::LevelChanged { level: 3 },
            GameEvent::LevelChanged { level: 4 },
        ]
    );
}

#[test]
fn test_saturated_score_stops_at_max_level() {
    let mut tracker = ScoreTracker::default();
    let mut events = Vec::new();
    let update = tracker.add_score(u64::MAX, &mut events);

    assert_eq!(tracker.score(), u64::MAX);
    assert_eq!(tracker.level(), MAX_LEVEL);
    assert_eq!(update.levels_gained, MAX_LEVEL - 1);
    assert_eq!(events.len(), MAX_LEVEL as usize);
    assert_eq!(events.last(), Some(&GameEvent::LevelChanged { level: MAX_LEVEL }));
    assert_eq!(tracker.multiplier_permille(), 1000 + 100 * u64::from(MAX_LEVEL - 1));

    // Further points only move the score.
    events.clear();
    let update = tracker.add_score(u64::MAX, &mut events);
    assert_eq!(update.levels_gained, 0);
    assert_eq!(events, vec![GameEvent::ScoreChanged { score: u64::MAX }]);
    assert_eq!(tracker.progress_to_next_level(), 1.0);
}

#[test]
fn test_multiplier_applies_after_level_up() {
    let mut tracker = ScoreTracker::default();
    tracker.add_score(1000, &mut ());
    assert_eq!(tracker.level(), 2);
    assert_eq!(tracker.multiplier_permille(), 1100);

    let update = tracker.add_score(45, &mut ());
    // 45 * 1.1 = 49.5, floored
    assert_eq!(update.awarded, 49);
    assert_eq!(tracker.score(), 1049);
}

#[test]
fn test_progress_within_level() {
    let mut tracker = ScoreTracker::default();
    assert_eq!(tracker.progress_to_next_level(), 0.0);
    tracker.add_score(500, &mut ());
    assert!((tracker.progress_to_next_level() - 0.5).abs() < 1e-6);

    // Level 2 spans 1000..2500
    tracker.add_score(800, &mut ());
    assert_eq!(tracker.level(), 2);
    let expected = (1300.0 - 1000.0) / 1500.0;
    assert!((tracker.progress_to_next_level() - expected).abs() < 1e-6);
}

#[test]
fn test_zero_points_changes_nothing_but_notifies() {
    let mut tracker = ScoreTracker::default();
    let mut events = Vec::new();
    let update = tracker.add_score(0, &mut events);
    assert_eq!(update.score, 0);
    assert_eq!(update.levels_gained, 0);
    assert_eq!(events, vec![GameEvent::ScoreChanged { score: 0 }]);
}

#[test]
fn test_reset_returns_to_level_one() {
    let mut tracker = ScoreTracker::default();
    tracker.add_score(3000, &mut ());
    let mut events = Vec::new();
    tracker.reset(&mut events);
    assert_eq!((tracker.score(), tracker.level()), (0, 1));
    assert_eq!(tracker.threshold(), 1000);
    assert_eq!(
        events,
        vec![
            GameEvent::ScoreChanged { score: 0 },
            GameEvent::LevelChanged { level: 1 }
        ]
    );
}

#[test]
fn test_rules_and_multiplier_saturate() {
    assert_eq!(ScoringRule::combo().pass_points(&[4], 0, 4), 40);
    assert_eq!(ScoringRule::combo().pass_points(&[4], 1, 4), 80);
    assert_eq!(ScoringRule::board_scan().pass_points(&[5], 0, 4), 120);
    assert_eq!(
        ScoringRule::Combo { base_points: u32::MAX }.pass_points(&[usize::MAX], u32::MAX, 4),
        u64::MAX
    );
    assert_eq!(apply_multiplier(u64::MAX, 2000), u64::MAX);
    assert_eq!(apply_multiplier(7, 1500), 10);
}
