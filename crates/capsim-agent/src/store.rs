//! Core agent storage: `PersonStore` (SoA data) and `AgentRngs` (per-agent
//! RNG), kept separate for the same borrow-checker reason the teacher's
//! `dt-agent` splits them: the engine needs `&mut AgentRngs` (exclusive
//! access to one agent's RNG) and `&PersonStore` (shared read access to
//! population state) at the same time inside `decide_action`.

use std::collections::HashMap;

use capsim_core::{AgentId, AgentRng, Profession, SimTime, TrendId};

use crate::person::{InterestVector, PersonMeta};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── Cooldowns ─────────────────────────────────────────────────────────────────

/// Per-agent cooldown timestamps for post/self-dev/purchase actions.
#[derive(Clone, Debug, Default)]
pub struct Cooldowns {
    pub last_post_ts: Option<SimTime>,
    pub last_selfdev_ts: Option<SimTime>,
    /// Keyed by purchase level.
    pub last_purchase_ts: HashMap<u32, SimTime>,
}

// ── PersonStore ───────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for every Person in the population.
///
/// Every `Vec` field has exactly `count` elements; `AgentId` is the index
/// into all of them.
pub struct PersonStore {
    /// Number of agents. Equals the length of every SoA `Vec`.
    pub count: usize,

    pub meta: Vec<PersonMeta>,
    pub profession: Vec<Profession>,

    // ── Five scalar attributes, each on [0, 5] ───────────────────────────
    pub financial_capability: Vec<f64>,
    pub trend_receptivity: Vec<f64>,
    pub social_status: Vec<f64>,
    pub energy_level: Vec<f64>,
    /// One-decimal numeric, step 0.5.
    pub time_budget: Vec<f64>,

    pub interests: Vec<InterestVector>,

    /// trend_id → sim-time of the most recent exposure. At most one
    /// entry per (agent, trend); retains the most recent timestamp. Kept
    /// per-run and unbounded for the run's whole lifetime — there is no
    /// periodic compaction, only the implicit drop when the `PersonStore`
    /// itself goes away at run end.
    pub exposure_history: Vec<HashMap<TrendId, SimTime>>,

    pub cooldowns: Vec<Cooldowns>,

    /// Today's purchase counter, keyed by product level; reset only on
    /// DailyReset.
    pub purchases_today: Vec<HashMap<u32, u32>>,

    /// Sim-time of the agent's most recent activity of any kind
    /// (publish, purchase, or self-dev) — a denormalized view over
    /// `cooldowns`/`purchases_today` for callers that want "what did this
    /// agent last do" without reading three separate fields and taking
    /// their max.
    pub last_activity_ts: Vec<Option<SimTime>>,
    /// Label of the activity `last_activity_ts` refers to: `"publish_post"`,
    /// `"purchase"`, or `"self_dev"`.
    pub last_activity_type: Vec<Option<&'static str>>,
    /// Count of publish/purchase/self-dev activities since the last
    /// DailyReset, across all three kinds combined (unlike
    /// `purchases_today`, which is per product level).
    pub total_activities_today: Vec<u32>,
}

impl PersonStore {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Record a publish/purchase/self-dev activity, updating the unified
    /// `last_activity_*` pair and the day's combined activity count.
    pub fn record_activity(&mut self, agent: AgentId, kind: &'static str, at: SimTime) {
        let i = agent.index();
        self.last_activity_ts[i] = Some(at);
        self.last_activity_type[i] = Some(kind);
        self.total_activities_today[i] += 1;
    }

    /// Record exposure of `agent` to `trend` at `sim_time`. At most one
    /// entry per (agent, trend) is kept, retaining the most recent time.
    /// Returns `true` if the exposure was fresh (i.e. either never exposed,
    /// or the prior exposure was at least `cooldown_min` sim-minutes ago) —
    /// callers use this to gate whether exposure attribute effects apply.
    pub fn record_exposure(&mut self, agent: AgentId, trend: TrendId, sim_time: SimTime, cooldown_min: f64) -> bool {
        let history = &mut self.exposure_history[agent.index()];
        let fresh = match history.get(&trend) {
            Some(last) => sim_time.since(*last) >= cooldown_min,
            None => true,
        };
        let should_update = match history.get(&trend) {
            Some(last) => sim_time > *last,
            None => true,
        };
        if should_update {
            history.insert(trend, sim_time);
        }
        fresh
    }

    pub(crate) fn new(count: usize, meta: Vec<PersonMeta>, profession: Vec<Profession>) -> Self {
        debug_assert_eq!(meta.len(), count);
        debug_assert_eq!(profession.len(), count);
        Self {
            count,
            meta,
            profession,
            financial_capability: vec![0.0; count],
            trend_receptivity: vec![0.0; count],
            social_status: vec![0.0; count],
            energy_level: vec![5.0; count],
            time_budget: vec![2.5; count],
            interests: vec![InterestVector::default(); count],
            exposure_history: (0..count).map(|_| HashMap::new()).collect(),
            cooldowns: vec![Cooldowns::default(); count],
            purchases_today: (0..count).map(|_| HashMap::new()).collect(),
            last_activity_ts: vec![None; count],
            last_activity_type: vec![None; count],
            total_activities_today: vec![0; count],
        }
    }
}
