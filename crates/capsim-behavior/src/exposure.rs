//! The exposure effect applied on `TrendInfluence` (spec.md §4.3.2).

use capsim_agent::history::{apply_update, Attribute, AttributeHistoryRow};
use capsim_agent::store::PersonStore;
use capsim_core::{AgentId, SimConfig, SimTime};
use capsim_reference::affinity;
use capsim_trend::Trend;

use crate::error::BehaviorResult;

/// Apply a `TrendInfluence(agent, trend)` dispatch to `agents`.
///
/// Freshness (first exposure, or the prior exposure to this trend was at
/// least `config.exposure_cooldown_min` sim-minutes ago) is recorded and
/// checked via [`PersonStore::record_exposure`]. A stale repeat exposure
/// still counts toward `trend.add_interaction()` at the caller's
/// discretion — this function only decides whether the attribute effect
/// applies, it does not touch `Trend` itself.
///
/// Returns the history rows produced (zero, one, or two: receptivity and
/// energy), in that order. Returns an empty `Vec` if the exposure was not
/// fresh, or if either delta was a no-op at a clamp boundary.
pub fn apply_exposure(
    agents: &mut PersonStore,
    agent: AgentId,
    trend: &Trend,
    config: &SimConfig,
    now: SimTime,
) -> BehaviorResult<Vec<AttributeHistoryRow>> {
    let fresh = agents.record_exposure(agent, trend.id, now, config.exposure_cooldown_min);
    if !fresh {
        return Ok(Vec::new());
    }

    let profession = agents.profession[agent.index()];
    let aff = affinity(profession, trend.topic)?;
    let coverage_factor = trend.coverage_factor();

    let mut rows = Vec::with_capacity(2);
    let d_receptivity = config.exposure_k1 * aff / 5.0 * coverage_factor;
    if let Some(row) = apply_update(
        agents,
        agent,
        Attribute::TrendReceptivity,
        d_receptivity,
        "trend_exposure",
        Some(trend.id),
        now,
    ) {
        rows.push(row);
    }

    if let Some(row) = apply_update(
        agents,
        agent,
        Attribute::EnergyLevel,
        -config.exposure_k2,
        "trend_exposure",
        Some(trend.id),
        now,
    ) {
        rows.push(row);
    }

    Ok(rows)
}
