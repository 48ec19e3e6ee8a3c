//! Unit tests for capsim-behavior.

use capsim_agent::PersonStoreBuilder;
use capsim_core::{AgentId, AgentRng, Profession, Sentiment, SimConfig, SimTime, Topic};
use capsim_trend::{Trend, TrendStore};

use crate::action::Action;
use crate::context::DecisionContext;
use crate::exposure::apply_exposure;
use crate::model::{CapsimDecisionModel, DecisionModel};
use crate::noop::NoopDecisionModel;
use crate::reach::{DefaultReachPolicy, ReachPolicy, ReachPolicyExt};

fn population(professions: Vec<Profession>, seed: u64) -> capsim_agent::PersonStore {
    PersonStoreBuilder::new(professions, seed).build().unwrap().0
}

// ── CapsimDecisionModel ──────────────────────────────────────────────────────

mod decision_model {
    use super::*;

    /// Mirrors scenario S1: a Developer with energy/time/trend_receptivity
    /// high and Knowledge-heavy interests should clear PublishPost's gate
    /// and pick Science as its best topic (since Science maps to Knowledge).
    #[test]
    fn publishes_on_best_interest_topic_when_score_clears_threshold() {
        let mut agents = population(vec![Profession::Developer], 42);
        agents.energy_level[0] = 5.0;
        agents.time_budget[0] = 5.0;
        agents.trend_receptivity[0] = 4.0;
        agents.social_status[0] = 4.0;
        agents.interests[0].set(capsim_core::InterestCategory::Knowledge, 4.5);

        let trends = TrendStore::new();
        let mut config = SimConfig::default();
        config.decide_threshold = 0.0;
        let ctx = DecisionContext::new(SimTime::ZERO, &agents, &trends, &config);
        let mut rng = AgentRng::new(1, AgentId(0));

        let action = CapsimDecisionModel.decide(AgentId(0), &ctx, &mut rng);
        match action {
            Some(Action::PublishPost { topic }) => assert_eq!(topic, Topic::Science),
            other => panic!("expected PublishPost, got {other:?}"),
        }
    }

    #[test]
    fn publish_post_blocked_when_energy_too_low() {
        let mut agents = population(vec![Profession::Developer], 7);
        agents.energy_level[0] = 0.5;
        agents.time_budget[0] = 5.0;
        agents.trend_receptivity[0] = 4.0;

        let trends = TrendStore::new();
        let mut config = SimConfig::default();
        config.decide_threshold = 0.0;
        let ctx = DecisionContext::new(SimTime::ZERO, &agents, &trends, &config);
        let mut rng = AgentRng::new(1, AgentId(0));

        // Even with every other gate wide open, PublishPost itself cannot
        // fire; some other action (or None) may still be returned.
        let action = CapsimDecisionModel.decide(AgentId(0), &ctx, &mut rng);
        assert!(!matches!(action, Some(Action::PublishPost { .. })));
    }

    #[test]
    fn publish_post_blocked_during_cooldown() {
        let mut agents = population(vec![Profession::Developer], 3);
        agents.energy_level[0] = 5.0;
        agents.time_budget[0] = 5.0;
        agents.trend_receptivity[0] = 4.0;
        agents.cooldowns[0].last_post_ts = Some(SimTime::new(10.0));

        let trends = TrendStore::new();
        let mut config = SimConfig::default();
        config.decide_threshold = 0.0;
        config.post_cooldown_min = 60.0;
        let ctx = DecisionContext::new(SimTime::new(20.0), &agents, &trends, &config);
        let mut rng = AgentRng::new(1, AgentId(0));

        let action = CapsimDecisionModel.decide(AgentId(0), &ctx, &mut rng);
        assert!(!matches!(action, Some(Action::PublishPost { .. })));
    }

    #[test]
    fn purchase_skips_level_at_daily_cap() {
        let mut agents = population(vec![Profession::Businessman], 5);
        agents.time_budget[0] = 5.0;
        agents.energy_level[0] = 0.0; // block PublishPost/SelfDev's energy gates
        agents.trend_receptivity[0] = 0.0; // block PublishPost
        agents.financial_capability[0] = 5.0;
        agents.purchases_today[0].insert(0, 999); // level 0 is at/over any cap

        let trends = TrendStore::new();
        let mut config = SimConfig::default();
        config.decide_threshold = 0.0;
        config.purchase_caps = vec![1, 2];
        let ctx = DecisionContext::new(SimTime::ZERO, &agents, &trends, &config);
        let mut rng = AgentRng::new(1, AgentId(0));

        let action = CapsimDecisionModel.decide(AgentId(0), &ctx, &mut rng);
        match action {
            Some(Action::Purchase { level }) => assert_eq!(level, 1),
            other => panic!("expected Purchase at level 1, got {other:?}"),
        }
    }

    #[test]
    fn no_action_when_nothing_clears_threshold() {
        let mut agents = population(vec![Profession::Developer], 9);
        agents.energy_level[0] = 0.0;
        agents.time_budget[0] = 0.0;
        agents.trend_receptivity[0] = 0.0;

        let trends = TrendStore::new();
        let config = SimConfig::default();
        let ctx = DecisionContext::new(SimTime::ZERO, &agents, &trends, &config);
        let mut rng = AgentRng::new(1, AgentId(0));

        assert_eq!(CapsimDecisionModel.decide(AgentId(0), &ctx, &mut rng), None);
    }
}

// ── NoopDecisionModel ─────────────────────────────────────────────────────────

mod noop {
    use super::*;

    #[test]
    fn never_produces_an_action() {
        let agents = population(vec![Profession::Developer], 1);
        let trends = TrendStore::new();
        let config = SimConfig::default();
        let ctx = DecisionContext::new(SimTime::ZERO, &agents, &trends, &config);
        let mut rng = AgentRng::new(1, AgentId(0));

        assert_eq!(NoopDecisionModel.decide(AgentId(0), &ctx, &mut rng), None);
    }
}

// ── ReachPolicy ───────────────────────────────────────────────────────────────

mod reach_policy {
    use super::*;

    #[test]
    fn default_policy_excludes_originator() {
        let agents = population(vec![Profession::Developer; 5], 1);
        let policy = DefaultReachPolicy::new(100);
        let mut rng = AgentRng::new(1, AgentId(0));

        let candidates = policy.candidates(AgentId(2), &agents, &mut rng);
        assert_eq!(candidates.len(), 4);
        assert!(!candidates.contains(&AgentId(2)));
    }

    #[test]
    fn default_policy_caps_at_fan_out_budget() {
        let agents = population(vec![Profession::Developer; 50], 1);
        let policy = DefaultReachPolicy::new(10);
        let mut rng = AgentRng::new(1, AgentId(0));

        let candidates = policy.candidates(AgentId(0), &agents, &mut rng);
        assert_eq!(candidates.len(), 10);
    }

    #[test]
    fn chained_policy_intersects_both_candidate_sets() {
        let agents = population(vec![Profession::Developer; 10], 1);
        let wide = DefaultReachPolicy::new(100);
        let narrow = DefaultReachPolicy::new(3);
        let mut rng = AgentRng::new(1, AgentId(0));

        let chained = wide.then(narrow);
        let candidates = chained.candidates(AgentId(0), &agents, &mut rng);
        assert!(candidates.len() <= 3);
        assert!(!candidates.contains(&AgentId(0)));
    }
}

// ── Exposure effect ───────────────────────────────────────────────────────────

mod exposure {
    use super::*;

    fn sample_trend(topic: Topic) -> Trend {
        Trend::new(
            capsim_core::TrendId(0),
            topic,
            Sentiment::Positive,
            AgentId(1),
            None,
            SimTime::ZERO,
            3.0,
        )
    }

    #[test]
    fn fresh_exposure_raises_receptivity_and_lowers_energy() {
        let mut agents = population(vec![Profession::Developer], 1);
        agents.trend_receptivity[0] = 1.0;
        agents.energy_level[0] = 5.0;
        let trend = sample_trend(Topic::Science);
        let config = SimConfig::default();

        let rows = apply_exposure(&mut agents, AgentId(0), &trend, &config, SimTime::new(10.0)).unwrap();

        assert!(agents.trend_receptivity[0] > 1.0);
        assert!(agents.energy_level[0] < 5.0);
        assert_eq!(rows.iter().filter(|r| r.reason == "trend_exposure").count(), rows.len());
        assert!(rows.iter().all(|r| r.source_trend == Some(trend.id)));
    }

    #[test]
    fn repeat_exposure_within_cooldown_produces_no_rows() {
        let mut agents = population(vec![Profession::Developer], 1);
        let trend = sample_trend(Topic::Science);
        let mut config = SimConfig::default();
        config.exposure_cooldown_min = 60.0;

        apply_exposure(&mut agents, AgentId(0), &trend, &config, SimTime::new(10.0)).unwrap();
        let receptivity_after_first = agents.trend_receptivity[0];

        let rows = apply_exposure(&mut agents, AgentId(0), &trend, &config, SimTime::new(20.0)).unwrap();
        assert!(rows.is_empty());
        assert_eq!(agents.trend_receptivity[0], receptivity_after_first);
    }

    #[test]
    fn exposure_past_cooldown_applies_again() {
        let mut agents = population(vec![Profession::Developer], 1);
        agents.trend_receptivity[0] = 1.0;
        let trend = sample_trend(Topic::Science);
        let mut config = SimConfig::default();
        config.exposure_cooldown_min = 60.0;

        apply_exposure(&mut agents, AgentId(0), &trend, &config, SimTime::new(10.0)).unwrap();
        let rows = apply_exposure(&mut agents, AgentId(0), &trend, &config, SimTime::new(100.0)).unwrap();
        assert!(!rows.is_empty());
    }

    #[test]
    fn receptivity_is_clamped_at_five() {
        let mut agents = population(vec![Profession::Developer], 1);
        agents.trend_receptivity[0] = 5.0;
        let trend = sample_trend(Topic::Science);
        let config = SimConfig::default();

        apply_exposure(&mut agents, AgentId(0), &trend, &config, SimTime::new(10.0)).unwrap();
        assert_eq!(agents.trend_receptivity[0], 5.0);
    }
}
