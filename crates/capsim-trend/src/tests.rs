//! Unit tests for capsim-trend primitives.

use capsim_core::{AgentId, Coverage, Sentiment, SimTime, Topic};

use crate::trend::Trend;

fn trend(base_virality: f64) -> Trend {
    Trend::new(
        capsim_core::TrendId(0),
        Topic::Science,
        Sentiment::Positive,
        AgentId(0),
        None,
        SimTime::ZERO,
        base_virality,
    )
}

#[test]
fn base_virality_is_clamped_at_construction() {
    assert_eq!(trend(7.0).base_virality, 5.0);
    assert_eq!(trend(-1.0).base_virality, 0.0);
}

#[test]
fn virality_grows_logarithmically_with_interactions() {
    let mut t = trend(2.0);
    let v0 = t.current_virality();
    for _ in 0..10 {
        t.add_interaction(50, 500);
    }
    let v10 = t.current_virality();
    assert!(v10 > v0, "virality should increase with interactions");
}

#[test]
fn virality_is_clamped_to_five() {
    let mut t = trend(5.0);
    for _ in 0..100_000 {
        t.add_interaction(50, 500);
    }
    assert!(t.current_virality() <= 5.0);
}

#[test]
fn coverage_starts_low() {
    assert_eq!(trend(1.0).coverage, Coverage::Low);
    assert_eq!(trend(1.0).coverage_factor(), 0.3);
}

#[test]
fn coverage_escalates_low_to_middle_at_threshold() {
    let mut t = trend(1.0);
    for _ in 0..49 {
        t.add_interaction(50, 500);
    }
    assert_eq!(t.coverage, Coverage::Low);
    t.add_interaction(50, 500);
    assert_eq!(t.coverage, Coverage::Middle);
    assert_eq!(t.coverage_factor(), 0.6);
}

#[test]
fn coverage_escalates_middle_to_high_at_threshold() {
    let mut t = trend(1.0);
    for _ in 0..500 {
        t.add_interaction(50, 500);
    }
    assert_eq!(t.coverage, Coverage::High);
    assert_eq!(t.coverage_factor(), 1.0);
}

#[test]
fn total_interactions_increments_by_exactly_one_per_call() {
    let mut t = trend(1.0);
    t.add_interaction(50, 500);
    t.add_interaction(50, 500);
    assert_eq!(t.total_interactions, 2);
}
