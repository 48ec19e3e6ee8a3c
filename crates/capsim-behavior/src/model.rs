//! The `DecisionModel` trait and the default scoring implementation for the
//! three discretionary agent actions (spec.md §4.3.1).

use capsim_agent::person::InterestVector;
use capsim_core::{AgentId, AgentRng, InterestCategory, Topic};
use capsim_reference::{affinity, topic_interest_category};

use crate::action::Action;
use crate::context::DecisionContext;

/// Pluggable agent decision function.
///
/// Implement this trait to define how agents choose their next discretionary
/// action. The engine calls `decide` for each idle eligible agent at a rate
/// derived from the agent's `time_budget` (target ~43 actions/agent/day
/// population-wide, per spec.md §4.5) — not once per dispatch.
///
/// # Thread safety
///
/// The engine is strictly single-threaded (spec.md §5); `Send` is required
/// only so the engine itself can be moved across the host's own threads, not
/// because `decide` is ever called concurrently.
pub trait DecisionModel: Send + 'static {
    /// Choose at most one action for `agent`, or `None` if no candidate
    /// action clears its gate and scoring threshold this call.
    fn decide(&self, agent: AgentId, ctx: &DecisionContext<'_>, rng: &mut AgentRng) -> Option<Action>;
}

/// The scoring/gating decision model specified in spec.md §4.3.1.
///
/// Evaluates all three discretionary actions in dispatch-table order
/// (PublishPost, Purchase, SelfDev) and returns the highest-scoring
/// candidate that clears both its precondition gate and
/// `config.decide_threshold`. Ties between action kinds are broken by that
/// same order (PublishPost beats Purchase beats SelfDev).
pub struct CapsimDecisionModel;

impl CapsimDecisionModel {
    /// The topic whose mapped interest category has the highest value for
    /// this agent, ties broken by `Topic::ALL`'s declaration order.
    ///
    /// Spec.md defines "best topic" as the argmax over the agent's interest
    /// vector; since interests are recorded over six categories and topics
    /// are a distinct seven-value enum, this resolves the mapping via
    /// `capsim-reference::topic_interest_category` (topic → its backing
    /// interest category) rather than treating interest categories and
    /// topics as interchangeable.
    fn best_topic(interests: &InterestVector) -> Topic {
        let mut best = Topic::ALL[0];
        let mut best_value = interests.get(topic_interest_category(best));
        for topic in Topic::ALL.into_iter().skip(1) {
            let value = interests.get(topic_interest_category(topic));
            if value > best_value {
                best = topic;
                best_value = value;
            }
        }
        best
    }

    fn score_publish_post(ctx: &DecisionContext<'_>, agent: AgentId, rng: &mut AgentRng) -> Option<(Action, f64)> {
        let i = agent.index();
        if ctx.agents.energy_level[i] < 1.0 {
            return None;
        }
        if ctx.agents.time_budget[i] < 1.0 {
            return None;
        }
        if ctx.agents.trend_receptivity[i] <= 0.0 {
            return None;
        }
        if let Some(last) = ctx.agents.cooldowns[i].last_post_ts {
            if ctx.now.since(last) < ctx.config.post_cooldown_min {
                return None;
            }
        }

        let profession = ctx.agents.profession[i];
        let topic = Self::best_topic(&ctx.agents.interests[i]);
        let interest = ctx.agents.interests[i].get(topic_interest_category(topic));
        let social_status = ctx.agents.social_status[i];
        let aff = affinity(profession, topic).ok()?;

        let score = (0.5 * interest / 5.0 + 0.3 * social_status / 5.0 + 0.2 * rng.gen_range(0.0..1.0)) * aff / 5.0;
        Some((Action::PublishPost { topic }, score))
    }

    /// Purchase gate/score: levels are checked in ascending order, returning
    /// the first level whose gate clears — spec.md does not define a
    /// cross-level scoring comparison, only per-level caps/cooldowns.
    fn score_purchase(ctx: &DecisionContext<'_>, agent: AgentId, rng: &mut AgentRng) -> Option<(Action, f64)> {
        let i = agent.index();
        if ctx.agents.time_budget[i] < 1.0 {
            return None;
        }

        for level in 0..ctx.config.purchase_caps.len() as u32 {
            let cap = ctx.config.purchase_caps[level as usize];
            let today = ctx.agents.purchases_today[i].get(&level).copied().unwrap_or(0);
            if today >= cap {
                continue;
            }
            if let Some(last) = ctx.agents.cooldowns[i].last_purchase_ts.get(&level) {
                if ctx.now.since(*last) < ctx.config.post_cooldown_min {
                    continue;
                }
            }
            let financial_capability = ctx.agents.financial_capability[i];
            let social_status = ctx.agents.social_status[i];
            let score = 0.5 * financial_capability / 5.0 + 0.3 * social_status / 5.0 + 0.2 * rng.gen_range(0.0..1.0);
            return Some((Action::Purchase { level }, score));
        }
        None
    }

    fn score_self_dev(ctx: &DecisionContext<'_>, agent: AgentId, rng: &mut AgentRng) -> Option<(Action, f64)> {
        let i = agent.index();
        if ctx.agents.energy_level[i] < 1.0 {
            return None;
        }
        if ctx.agents.time_budget[i] < 1.0 {
            return None;
        }
        if let Some(last) = ctx.agents.cooldowns[i].last_selfdev_ts {
            if ctx.now.since(last) < ctx.config.post_cooldown_min {
                return None;
            }
        }
        let knowledge = ctx.agents.interests[i].get(InterestCategory::Knowledge);
        let time_budget = ctx.agents.time_budget[i];
        let score = 0.5 * knowledge / 5.0 + 0.3 * time_budget / 5.0 + 0.2 * rng.gen_range(0.0..1.0);
        Some((Action::SelfDev, score))
    }
}

impl DecisionModel for CapsimDecisionModel {
    fn decide(&self, agent: AgentId, ctx: &DecisionContext<'_>, rng: &mut AgentRng) -> Option<Action> {
        let threshold = ctx.config.decide_threshold;
        let candidates = [
            Self::score_publish_post(ctx, agent, rng),
            Self::score_purchase(ctx, agent, rng),
            Self::score_self_dev(ctx, agent, rng),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter(|&(_, score)| score >= threshold)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(action, _)| action)
    }
}
