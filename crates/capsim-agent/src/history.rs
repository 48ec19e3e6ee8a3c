//! Attribute change history and the update routine that enforces the
//! population's scalar invariants.

use capsim_core::{AgentId, SimTime, TrendId};

use crate::store::PersonStore;

/// One recorded change to a scalar attribute.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeHistoryRow {
    pub agent_id: AgentId,
    pub attribute: &'static str,
    pub old_value: f64,
    pub new_value: f64,
    pub delta: f64,
    pub reason: &'static str,
    pub source_trend: Option<TrendId>,
    pub sim_time: SimTime,
}

/// A named, mutable scalar attribute slot on `PersonStore`, used so
/// `apply_update` can be generic over which of the five attributes it's
/// touching without five near-identical call sites.
pub enum Attribute {
    FinancialCapability,
    TrendReceptivity,
    SocialStatus,
    EnergyLevel,
    TimeBudget,
}

impl Attribute {
    fn name(&self) -> &'static str {
        match self {
            Attribute::FinancialCapability => "financial_capability",
            Attribute::TrendReceptivity => "trend_receptivity",
            Attribute::SocialStatus => "social_status",
            Attribute::EnergyLevel => "energy_level",
            Attribute::TimeBudget => "time_budget",
        }
    }

    fn slot<'a>(&self, store: &'a mut PersonStore, agent: AgentId) -> &'a mut f64 {
        let i = agent.index();
        match self {
            Attribute::FinancialCapability => &mut store.financial_capability[i],
            Attribute::TrendReceptivity => &mut store.trend_receptivity[i],
            Attribute::SocialStatus => &mut store.social_status[i],
            Attribute::EnergyLevel => &mut store.energy_level[i],
            Attribute::TimeBudget => &mut store.time_budget[i],
        }
    }

    /// Normalize a proposed new value before it's stored: clamp to [0, 5],
    /// and for `time_budget` additionally round to the nearest 0.5 step.
    fn normalize(&self, value: f64) -> f64 {
        let clamped = value.clamp(0.0, 5.0);
        match self {
            Attribute::TimeBudget => (clamped * 2.0).round() / 2.0,
            _ => clamped,
        }
    }
}

/// Apply `delta` to `attribute` on `agent`, clamping to [0, 5] (rounding
/// `time_budget` to the nearest 0.5) and returning a history row describing
/// the actual change applied. Returns `None` if the normalized value equals
/// the old value (no-op change, e.g. already at the floor or ceiling).
pub fn apply_update(
    store: &mut PersonStore,
    agent: AgentId,
    attribute: Attribute,
    delta: f64,
    reason: &'static str,
    source_trend: Option<TrendId>,
    sim_time: SimTime,
) -> Option<AttributeHistoryRow> {
    let slot = attribute.slot(store, agent);
    let old_value = *slot;
    let new_value = attribute.normalize(old_value + delta);
    if new_value == old_value {
        return None;
    }
    *slot = new_value;
    Some(AttributeHistoryRow {
        agent_id: agent,
        attribute: attribute.name(),
        old_value,
        new_value,
        delta: new_value - old_value,
        reason,
        source_trend,
        sim_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(n: usize) -> PersonStore {
        PersonStore::new(
            n,
            (0..n)
                .map(|_| crate::person::PersonMeta {
                    first_name: "A".into(),
                    last_name: "B".into(),
                    gender: crate::person::Gender::Female,
                    date_of_birth: crate::person::BirthDate::new(1990, 1, 1, 2025).unwrap(),
                })
                .collect(),
            vec![capsim_core::Profession::Developer; n],
        )
    }

    #[test]
    fn clamps_to_upper_bound() {
        let mut s = store(1);
        s.energy_level[0] = 4.8;
        let row = apply_update(&mut s, AgentId(0), Attribute::EnergyLevel, 1.0, "test", None, SimTime::ZERO).unwrap();
        assert_eq!(row.new_value, 5.0);
        assert_eq!(s.energy_level[0], 5.0);
    }

    #[test]
    fn clamps_to_lower_bound() {
        let mut s = store(1);
        s.energy_level[0] = 0.2;
        let row = apply_update(&mut s, AgentId(0), Attribute::EnergyLevel, -1.0, "test", None, SimTime::ZERO).unwrap();
        assert_eq!(row.new_value, 0.0);
    }

    #[test]
    fn no_op_at_boundary_returns_none() {
        let mut s = store(1);
        s.energy_level[0] = 5.0;
        let row = apply_update(&mut s, AgentId(0), Attribute::EnergyLevel, 1.0, "test", None, SimTime::ZERO);
        assert!(row.is_none());
    }

    #[test]
    fn time_budget_rounds_to_half_step() {
        let mut s = store(1);
        s.time_budget[0] = 2.0;
        let row = apply_update(&mut s, AgentId(0), Attribute::TimeBudget, 0.3, "test", None, SimTime::ZERO).unwrap();
        assert_eq!(row.new_value, 2.5);
    }

    #[test]
    fn exposure_is_fresh_on_first_contact() {
        let mut s = store(1);
        let fresh = s.record_exposure(AgentId(0), TrendId(0), SimTime::new(10.0), 60.0);
        assert!(fresh);
    }

    #[test]
    fn exposure_within_cooldown_is_stale() {
        let mut s = store(1);
        s.record_exposure(AgentId(0), TrendId(0), SimTime::new(10.0), 60.0);
        let fresh = s.record_exposure(AgentId(0), TrendId(0), SimTime::new(20.0), 60.0);
        assert!(!fresh);
    }

    #[test]
    fn exposure_past_cooldown_is_fresh_again() {
        let mut s = store(1);
        s.record_exposure(AgentId(0), TrendId(0), SimTime::new(10.0), 60.0);
        let fresh = s.record_exposure(AgentId(0), TrendId(0), SimTime::new(80.0), 60.0);
        assert!(fresh);
    }

    #[test]
    fn exposure_history_keeps_most_recent_timestamp() {
        let mut s = store(1);
        s.record_exposure(AgentId(0), TrendId(0), SimTime::new(80.0), 60.0);
        s.record_exposure(AgentId(0), TrendId(0), SimTime::new(10.0), 60.0);
        assert_eq!(s.exposure_history[0][&TrendId(0)], SimTime::new(80.0));
    }
}
