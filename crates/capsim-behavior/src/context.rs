//! Read-only simulation state passed to every decision-model callback.

use capsim_agent::PersonStore;
use capsim_core::SimConfig;
use capsim_core::SimTime;
use capsim_trend::TrendStore;

/// A read-only snapshot of the simulation state passed to
/// [`DecisionModel`][crate::DecisionModel] callbacks.
///
/// `DecisionContext` is built once per dispatch by the engine and shared
/// (immutably) across the call — no heap allocation happens between calls,
/// the same borrows are simply re-pointed at the engine's owned state.
///
/// # Lifetimes
///
/// All borrows live for the duration of a single `decide`/exposure call. The
/// engine never allows mutable access to `agents`/`trends` while a
/// `DecisionContext` borrowing them is live.
pub struct DecisionContext<'a> {
    /// Current simulated time.
    pub now: SimTime,

    /// Read-only view of every agent's SoA state arrays.
    pub agents: &'a PersonStore,

    /// Read-only view of every trend created so far this run.
    pub trends: &'a TrendStore,

    /// Run-wide tunables (thresholds, cooldowns, caps).
    pub config: &'a SimConfig,
}

impl<'a> DecisionContext<'a> {
    #[inline]
    pub fn new(now: SimTime, agents: &'a PersonStore, trends: &'a TrendStore, config: &'a SimConfig) -> Self {
        Self { now, agents, trends, config }
    }
}
