//! `ReachPolicy` — pluggable candidate-exposure set for a `PublishPost`.
//!
//! spec.md §9 leaves the candidate-exposure set for a published trend
//! unspecified by the source system and makes it explicitly pluggable,
//! defaulting to "all participants except originator, rate-limited by an
//! engine-level fan-out budget per sim-minute". Modeled on dt-schedule's
//! `ScheduleModifier`/`ChainedModifier` composability: a trait plus a
//! `.then()` combinator rather than a single hardcoded policy, so a host can
//! layer a social-graph filter on top of the default budget cap without the
//! engine knowing about it.

use capsim_agent::PersonStore;
use capsim_core::{AgentId, AgentRng};

/// Chooses which agents are exposed to a freshly published trend.
///
/// # Contract
///
/// - Must never include `originator` in the returned set.
/// - Must be deterministic given the same `rng` state.
/// - Must not perform I/O.
pub trait ReachPolicy: Send + 'static {
    /// Candidate agents to enqueue a `TrendInfluence` for, given the
    /// originator and the full population.
    fn candidates(&self, originator: AgentId, agents: &PersonStore, rng: &mut AgentRng) -> Vec<AgentId>;
}

/// The default policy: every other participant, capped at
/// `fan_out_budget_per_minute` candidates per call.
///
/// When the uncapped candidate set exceeds the budget, a uniform random
/// subset of that size is kept (via a full shuffle), preserving determinism
/// for a given `rng` state.
pub struct DefaultReachPolicy {
    pub fan_out_budget: u32,
}

impl DefaultReachPolicy {
    pub fn new(fan_out_budget: u32) -> Self {
        Self { fan_out_budget }
    }
}

impl ReachPolicy for DefaultReachPolicy {
    fn candidates(&self, originator: AgentId, agents: &PersonStore, rng: &mut AgentRng) -> Vec<AgentId> {
        let mut pool: Vec<AgentId> = agents.agent_ids().filter(|&a| a != originator).collect();
        let budget = self.fan_out_budget as usize;
        if pool.len() <= budget {
            return pool;
        }
        rng.shuffle(&mut pool);
        pool.truncate(budget);
        pool
    }
}

/// Applies two policies in sequence, intersecting their candidate sets.
///
/// The second policy's output is filtered down to agents the first policy
/// also selected, so chaining narrows the set (e.g. a social-graph filter
/// layered on top of `DefaultReachPolicy`'s budget cap). Construct chains
/// with `policy_a.then(policy_b)`.
pub struct ChainedReachPolicy<A: ReachPolicy, B: ReachPolicy> {
    first: A,
    second: B,
}

impl<A: ReachPolicy, B: ReachPolicy> ReachPolicy for ChainedReachPolicy<A, B> {
    fn candidates(&self, originator: AgentId, agents: &PersonStore, rng: &mut AgentRng) -> Vec<AgentId> {
        let from_first = self.first.candidates(originator, agents, rng);
        let from_second = self.second.candidates(originator, agents, rng);
        from_first.into_iter().filter(|a| from_second.contains(a)).collect()
    }
}

/// Extension trait that adds `.then(other)` to any `ReachPolicy`.
pub trait ReachPolicyExt: ReachPolicy + Sized {
    fn then<B: ReachPolicy>(self, other: B) -> ChainedReachPolicy<Self, B> {
        ChainedReachPolicy { first: self, second: other }
    }
}

impl<P: ReachPolicy + Sized> ReachPolicyExt for P {}
