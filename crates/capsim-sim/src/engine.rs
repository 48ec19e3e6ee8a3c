//! The scheduler/engine (C6): a single-threaded, cooperative event-pop /
//! dispatch / reschedule loop over [`EventQueue`], replacing dt-sim's
//! two-phase (parallel-intent, sequential-apply) tick loop entirely
//! (spec.md §4.5). Where the teacher advanced every agent once per fixed
//! tick, CAPSIM has no ticks at all: time only ever advances to the
//! timestamp of whichever event is popped next, and an agent's next
//! discretionary action is produced by the engine calling into a
//! [`DecisionModel`] at a rate derived from `target_actions_per_agent_per_day`
//! rather than once per agent per tick.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use capsim_agent::history::{apply_update, Attribute};
use capsim_agent::store::{AgentRngs, PersonStore};
use capsim_behavior::{apply_exposure, Action, DecisionContext, DecisionModel, ReachPolicy};
use capsim_core::{AgentId, Clock, EventId, RunId, RunStatus, Sentiment, SimConfig, SimRng, SimTime, Topic, TrendId};
use capsim_event::{Event, EventKind, EventQueue};
use capsim_reference::{affinity, topic_interest_category};
use capsim_repo::{BatchCommitter, Repository};
use capsim_trend::{Trend, TrendStore};

use crate::error::{SimError, SimResult};
use crate::observer::{EngineObserver, EngineStatus};
use crate::shutdown::{ShutdownController, ShutdownMode};

/// Resident-queue occupancy above which the engine defers generating new
/// discretionary events (Purchase, SelfDev, PublishPost) until headroom
/// returns (spec.md §4.2).
const BACKPRESSURE_OCCUPANCY: f64 = 0.9;

const DAILY_RESET_PERIOD_MIN: f64 = 1440.0;
const ENERGY_RECOVERY_PERIOD_MIN: f64 = 360.0;

fn is_system_kind(kind: &EventKind) -> bool {
    matches!(kind, EventKind::DailyReset | EventKind::EnergyRecovery | EventKind::SaveDailyTrends)
}

/// The topic whose mapped interest category is highest for this agent, ties
/// broken by `Topic::ALL`'s declaration order — the same "best topic"
/// CAPSIM's decision model uses to pick a `PublishPost` topic, reused here
/// so a `SelfDev` action deepens the interest category the agent is
/// already most engaged with (per the grounding note on
/// `capsim_reference::topic_interest_category`).
fn best_topic(agents: &PersonStore, agent: AgentId) -> Topic {
    let i = agent.index();
    let mut best = Topic::ALL[0];
    let mut best_value = agents.interests[i].get(topic_interest_category(best));
    for topic in Topic::ALL.into_iter().skip(1) {
        let value = agents.interests[i].get(topic_interest_category(topic));
        if value > best_value {
            best = topic;
            best_value = value;
        }
    }
    best
}

/// Paces discretionary-action generation to a target population-wide rate
/// (spec.md §4.5: "~43 actions/agent/day"), rather than giving every agent
/// a chance on every dispatch. Accrues a fractional budget as sim-time
/// elapses and spends whole units cycling through agents round-robin, so
/// the long-run rate converges on the target regardless of how bursty event
/// dispatch is moment to moment.
struct DiscretionaryPacer {
    cursor: usize,
    budget: f64,
    last_update: SimTime,
}

impl DiscretionaryPacer {
    fn new() -> Self {
        Self { cursor: 0, budget: 0.0, last_update: SimTime::ZERO }
    }

    fn replenish(&mut self, now: SimTime, num_agents: usize, rate_per_agent_per_day: f64) {
        if num_agents == 0 {
            return;
        }
        let elapsed = now.since(self.last_update).max(0.0);
        self.budget += elapsed / DAILY_RESET_PERIOD_MIN * num_agents as f64 * rate_per_agent_per_day;
        self.last_update = now;
    }

    fn next_agents(&mut self, num_agents: usize) -> Vec<AgentId> {
        let mut out = Vec::new();
        if num_agents == 0 {
            return out;
        }
        while self.budget >= 1.0 {
            out.push(AgentId(self.cursor as u32));
            self.cursor = (self.cursor + 1) % num_agents;
            self.budget -= 1.0;
        }
        out
    }
}

/// A cheaply cloneable external handle to a running [`Engine`]: the
/// `Stop`/`Status` half of spec.md §6's lifecycle API, usable from a
/// different thread than the one blocked inside `Engine::start`.
#[derive(Clone)]
pub struct EngineHandle {
    run_id: RunId,
    observer: Arc<EngineObserver>,
    shutdown: ShutdownController,
}

impl EngineHandle {
    /// Request termination. See [`ShutdownController::request`].
    pub fn stop(&self, mode: ShutdownMode) {
        self.shutdown.request(mode);
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            run_id: self.run_id,
            sim_time: self.observer.current_sim_time(),
            events_processed: self.observer.events_processed(),
            queue_len: self.observer.queue_len(),
            phase: self.observer.phase(),
        }
    }
}

/// The scheduler/engine: owns every piece of run state and drives the
/// dispatch loop. Constructed only via [`EngineBuilder`][crate::EngineBuilder].
pub struct Engine<R: Repository> {
    pub(crate) config: SimConfig,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) queue: EventQueue,
    pub(crate) agents: PersonStore,
    pub(crate) agent_rngs: AgentRngs,
    pub(crate) trends: TrendStore,
    pub(crate) decision_model: Box<dyn DecisionModel>,
    pub(crate) reach_policy: Box<dyn ReachPolicy>,
    pub(crate) committer: BatchCommitter<R>,
    pub(crate) sim_rng: SimRng,
    pub(crate) observer: Arc<EngineObserver>,
    pub(crate) shutdown: ShutdownController,
    pub(crate) status: RunStatus,
    pub(crate) run_id: RunId,
    pub(crate) next_event_id: u64,
    pub(crate) admit_discretionary: bool,
    pacer: DiscretionaryPacer,
}

impl<R: Repository> Engine<R> {
    pub(crate) fn new(
        config: SimConfig,
        clock: Box<dyn Clock>,
        queue: EventQueue,
        agents: PersonStore,
        agent_rngs: AgentRngs,
        trends: TrendStore,
        decision_model: Box<dyn DecisionModel>,
        reach_policy: Box<dyn ReachPolicy>,
        committer: BatchCommitter<R>,
        sim_rng: SimRng,
        shutdown: ShutdownController,
        run_id: RunId,
        next_event_id: u64,
    ) -> Self {
        Self {
            config,
            clock,
            queue,
            agents,
            agent_rngs,
            trends,
            decision_model,
            reach_policy,
            committer,
            sim_rng,
            observer: Arc::new(EngineObserver::new()),
            shutdown,
            status: RunStatus::Initialized,
            run_id,
            next_event_id,
            admit_discretionary: true,
            pacer: DiscretionaryPacer::new(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The repository backing this run, for a host to inspect committed
    /// rows after [`Engine::start`] returns (mirrors the read-only
    /// post-run inspection `examples/xsmall`'s demo does via `sim.mobility`).
    pub fn repo(&self) -> &R {
        self.committer.repo()
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            run_id: self.run_id,
            observer: self.observer.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            run_id: self.run_id,
            sim_time: self.clock.now(),
            events_processed: self.observer.events_processed(),
            queue_len: self.queue.len(),
            phase: self.status,
        }
    }

    /// Request termination from within the same thread driving `start`
    /// (e.g. a signal handler installed before calling `start`). External
    /// callers on another thread should go through [`Engine::handle`]
    /// instead.
    pub fn stop(&self, mode: ShutdownMode) {
        self.shutdown.request(mode);
    }

    /// Block until the run reaches its natural end, a stop request drains,
    /// or a fatal error occurs.
    ///
    /// Returns `Err` only for the pre-loop "already started" config error.
    /// Once the run loop has begun, every failure — an invariant violation,
    /// a repository error surfacing through shutdown — is absorbed here:
    /// it is logged and reflected by `status().phase == RunStatus::Failed`,
    /// never by propagating `Err` out of this call. A caller that only
    /// checks `?` on `start()` and never reads `status()` would otherwise
    /// miss a mid-run failure silently; driving both through the same
    /// `Status` the external `EngineHandle` already exposes means there is
    /// exactly one place to look.
    ///
    /// May only be called once: re-entering after the run has already
    /// reached a terminal phase is a config error, matching spec.md §1's
    /// "no interactive steering beyond stop".
    pub fn start(&mut self) -> SimResult<()> {
        if self.status != RunStatus::Initialized {
            return Err(SimError::Config("engine has already been started".into()));
        }
        self.status = RunStatus::Running;
        self.observer.set_phase(RunStatus::Running);

        match self.run_loop() {
            Ok(()) => {
                let mode = self.shutdown.requested_mode().unwrap_or(ShutdownMode::Graceful);
                self.shutdown_to(mode);
            }
            Err(err) => {
                tracing::error!(error = %err, "fatal error in engine loop; forcing shutdown");
                self.shutdown_to(ShutdownMode::Forced);
            }
        }
        Ok(())
    }

    fn run_loop(&mut self) -> SimResult<()> {
        let end = self.config.end_sim_time();
        loop {
            if self.shutdown.is_triggered() {
                self.status = RunStatus::Stopping;
                self.observer.set_phase(RunStatus::Stopping);
                break;
            }
            let Some(peek) = self.queue.peek_time() else { break };
            if peek > end {
                break;
            }
            let event = self.queue.pop().expect("peek_time returned Some");
            self.clock.sleep_until(event.timestamp);
            self.dispatch(event)?;
            self.observer.set_queue_len(self.queue.len());
            self.observer.set_sim_time(self.clock.now());
            self.run_discretionary_phase()?;
            self.committer.maybe_flush(self.clock.now())?;
        }
        Ok(())
    }

    // ── Shutdown ──────────────────────────────────────────────────────────

    /// Drives the run to a terminal phase. Never propagates a failure to
    /// its caller (spec.md §7's surface policy) — every failure encountered
    /// while shutting down is logged and still lands on a terminal phase,
    /// escalating to `Failed` rather than leaving the run stuck in
    /// `Stopping`.
    fn shutdown_to(&mut self, mode: ShutdownMode) {
        if self.status.is_terminal() {
            return;
        }
        self.status = RunStatus::Stopping;
        self.observer.set_phase(RunStatus::Stopping);

        match mode {
            ShutdownMode::Graceful => self.shutdown_graceful(),
            ShutdownMode::Forced => self.shutdown_forced(),
        }
    }

    fn shutdown_graceful(&mut self) {
        self.admit_discretionary = false;
        let deadline = Instant::now() + Duration::from_secs(25);
        loop {
            if Instant::now() >= deadline {
                tracing::warn!("graceful shutdown exceeded its soft deadline; escalating to forced");
                return self.shutdown_forced();
            }
            match self.queue.pop() {
                None => break,
                Some(event) => {
                    if is_system_kind(&event.kind) {
                        if let Err(err) = self.dispatch(event) {
                            tracing::error!(error = %err, "graceful shutdown: dispatch failed, escalating to forced");
                            return self.shutdown_forced();
                        }
                    }
                }
            }
        }
        if let Err(err) = self.committer.flush_now(self.clock.now()) {
            tracing::error!(error = %err, "graceful shutdown: final flush failed, escalating to forced");
            return self.shutdown_forced();
        }
        self.mark_terminal(RunStatus::Completed);
    }

    fn shutdown_forced(&mut self) {
        let discarded = self.queue.drain().len();
        if discarded > 0 {
            tracing::warn!(discarded, "forced shutdown discarding in-flight events");
        }
        if let Err(err) = self.committer.flush_now(self.clock.now()) {
            tracing::error!(error = %err, "forced shutdown: best-effort flush failed, data lost");
        }
        self.mark_terminal(RunStatus::Failed);
    }

    /// Best-effort: a repository failure here is logged, not propagated —
    /// the run still lands on `status`/`observer`'s terminal phase even if
    /// the durable `runs` row couldn't be updated to match.
    fn mark_terminal(&mut self, status: RunStatus) {
        let now = self.clock.now();
        let ended_at = SystemTime::now();
        if let Err(err) = self.committer.repo_mut().mark_run_terminal(self.run_id, status, now, ended_at) {
            tracing::error!(error = %err, "failed to persist terminal run status");
        }
        self.status = status;
        self.observer.set_phase(status);
    }

    // ── Event plumbing ──────────────────────────────────────────────────

    fn push_event(&mut self, agent: Option<AgentId>, trend: Option<TrendId>, kind: EventKind, at: SimTime) -> SimResult<()> {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        let event = Event::new(id, at, agent, trend, kind);
        self.queue.push(event).map_err(|err| {
            tracing::error!(error = %err, "event queue capacity exceeded");
            SimError::InvariantViolation(err.to_string())
        })
    }

    fn jittered(&mut self, at: SimTime) -> SimTime {
        let window = self.config.jitter_window_min.max(f64::EPSILON);
        at.offset(self.sim_rng.gen_range(0.0..window))
    }

    // ── Dispatch matrix (spec.md §4.5) ──────────────────────────────────

    fn dispatch(&mut self, mut event: Event) -> SimResult<()> {
        let start = Instant::now();
        let now = event.timestamp;

        match event.kind.clone() {
            EventKind::DailyReset => self.handle_daily_reset(now)?,
            EventKind::EnergyRecovery => self.handle_energy_recovery(now)?,
            EventKind::SaveDailyTrends => self.handle_save_daily_trends(),
            EventKind::PublishPost { topic } => {
                let agent = event.agent_id.expect("PublishPost always carries an agent_id");
                self.handle_publish_post(agent, topic, now)?;
            }
            EventKind::Purchase { level } => {
                let agent = event.agent_id.expect("Purchase always carries an agent_id");
                self.handle_purchase(agent, level, now);
            }
            EventKind::SelfDev => {
                let agent = event.agent_id.expect("SelfDev always carries an agent_id");
                self.handle_self_dev(agent, now);
            }
            EventKind::TrendInfluence => {
                let agent = event.agent_id.expect("TrendInfluence always carries an agent_id");
                let trend_id = event.trend_id.expect("TrendInfluence always carries a trend_id");
                self.handle_trend_influence(agent, trend_id, now)?;
            }
        }

        event.processed_at = Some(Instant::now());
        event.processing_duration = Some(start.elapsed());
        self.committer.enqueue_event(&event);
        self.observer.record_event();
        Ok(())
    }

    fn handle_daily_reset(&mut self, now: SimTime) -> SimResult<()> {
        for i in 0..self.agents.count {
            self.agents.purchases_today[i].clear();
            self.agents.total_activities_today[i] = 0;
        }
        self.push_event(None, None, EventKind::DailyReset, now.offset(DAILY_RESET_PERIOD_MIN))?;
        self.push_event(None, None, EventKind::SaveDailyTrends, now.offset(DAILY_RESET_PERIOD_MIN))?;
        Ok(())
    }

    fn handle_energy_recovery(&mut self, now: SimTime) -> SimResult<()> {
        for i in 0..self.agents.count {
            if self.agents.energy_level[i] < 5.0 {
                let agent = AgentId(i as u32);
                if let Some(row) = apply_update(
                    &mut self.agents,
                    agent,
                    Attribute::EnergyLevel,
                    self.config.energy_recovery_delta,
                    "energy_recovery",
                    None,
                    now,
                ) {
                    self.committer.enqueue_attribute_history([row]);
                }
            }
        }
        self.push_event(None, None, EventKind::EnergyRecovery, now.offset(ENERGY_RECOVERY_PERIOD_MIN))?;
        Ok(())
    }

    fn handle_save_daily_trends(&mut self) {
        for trend in self.trends.iter() {
            self.committer.enqueue_trend(trend.clone());
        }
    }

    /// Re-derives the publish score on the same formula
    /// `CapsimDecisionModel` uses (spec.md §4.3.1) rather than threading the
    /// decide-time score through the event payload: `EventKind::PublishPost`
    /// only carries `topic`, and a host may swap in its own `DecisionModel`
    /// that never computed a comparable score at all, so the engine always
    /// derives `base_virality` itself at dispatch time.
    fn publish_base_virality(&mut self, agent: AgentId, topic: Topic) -> SimResult<f64> {
        let i = agent.index();
        let interest = self.agents.interests[i].get(topic_interest_category(topic));
        let social_status = self.agents.social_status[i];
        let profession = self.agents.profession[i];
        let aff = affinity(profession, topic)?;
        let noise: f64 = self.agent_rngs.get_mut(agent).gen_range(0.0..1.0);
        let score = (0.5 * interest / 5.0 + 0.3 * social_status / 5.0 + 0.2 * noise) * aff / 5.0;
        Ok(score.clamp(0.0, 5.0))
    }

    /// Sentiment heuristic supplementing spec.md §4.3.1 (left unspecified
    /// there): `Conspiracy` trends skew negative, everything else skews
    /// positive, per the source migration's qualitative note on `Sentiment`.
    fn publish_sentiment(&mut self, topic: Topic) -> Sentiment {
        let p_negative = if topic == Topic::Conspiracy { 0.7 } else { 0.1 };
        if self.sim_rng.gen_bool(p_negative) {
            Sentiment::Negative
        } else {
            Sentiment::Positive
        }
    }

    fn handle_publish_post(&mut self, agent: AgentId, topic: Topic, now: SimTime) -> SimResult<()> {
        let base_virality = self.publish_base_virality(agent, topic)?;
        let sentiment = self.publish_sentiment(topic);
        let trend_id = self.trends.next_id();
        let trend = Trend::new(trend_id, topic, sentiment, agent, None, now, base_virality);
        self.trends.insert(trend.clone());
        self.committer.enqueue_trend(trend);

        if let Some(row) = apply_update(
            &mut self.agents,
            agent,
            Attribute::EnergyLevel,
            -self.config.publish_energy_cost,
            "publish_post",
            None,
            now,
        ) {
            self.committer.enqueue_attribute_history([row]);
        }
        if let Some(row) = apply_update(
            &mut self.agents,
            agent,
            Attribute::TimeBudget,
            -self.config.publish_time_cost,
            "publish_post",
            None,
            now,
        ) {
            self.committer.enqueue_attribute_history([row]);
        }
        self.agents.cooldowns[agent.index()].last_post_ts = Some(now);
        self.agents.record_activity(agent, "publish_post", now);

        let candidates = {
            let rng = self.agent_rngs.get_mut(agent);
            self.reach_policy.candidates(agent, &self.agents, rng)
        };
        for candidate in candidates {
            let at = self.jittered(now);
            self.push_event(Some(candidate), Some(trend_id), EventKind::TrendInfluence, at)?;
        }
        Ok(())
    }

    fn handle_purchase(&mut self, agent: AgentId, level: u32, now: SimTime) {
        let i = agent.index();
        let cap = self.config.purchase_caps.get(level as usize).copied().unwrap_or(0);
        let today = self.agents.purchases_today[i].get(&level).copied().unwrap_or(0);
        if today >= cap {
            return;
        }
        if let Some(last) = self.agents.cooldowns[i].last_purchase_ts.get(&level) {
            if now.since(*last) < self.config.post_cooldown_min {
                return;
            }
        }

        let delta = -self.config.purchase_cost_per_level * (level as f64 + 1.0);
        if let Some(row) = apply_update(&mut self.agents, agent, Attribute::FinancialCapability, delta, "purchase", None, now) {
            self.committer.enqueue_attribute_history([row]);
        }
        *self.agents.purchases_today[i].entry(level).or_insert(0) += 1;
        self.agents.cooldowns[i].last_purchase_ts.insert(level, now);
        self.agents.record_activity(agent, "purchase", now);
    }

    fn handle_self_dev(&mut self, agent: AgentId, now: SimTime) {
        let i = agent.index();
        let topic = best_topic(&self.agents, agent);
        let category = topic_interest_category(topic);
        let current = self.agents.interests[i].get(category);
        self.agents.interests[i].set(category, current + self.config.selfdev_knowledge_delta);
        self.agents.cooldowns[i].last_selfdev_ts = Some(now);
        self.agents.record_activity(agent, "self_dev", now);
    }

    fn handle_trend_influence(&mut self, agent: AgentId, trend_id: TrendId, now: SimTime) -> SimResult<()> {
        let trend = self.trends.get(trend_id)?.clone();
        let rows = apply_exposure(&mut self.agents, agent, &trend, &self.config, now)?;
        if !rows.is_empty() {
            self.committer.enqueue_attribute_history(rows);
        }
        let t = self.trends.get_mut(trend_id)?;
        t.add_interaction(self.config.coverage_middle_threshold, self.config.coverage_high_threshold);
        self.committer.enqueue_trend(t.clone());
        Ok(())
    }

    // ── Discretionary action generation (spec.md §4.5) ──────────────────

    fn run_discretionary_phase(&mut self) -> SimResult<()> {
        let now = self.clock.now();
        self.pacer.replenish(now, self.agents.count, self.config.target_actions_per_agent_per_day);

        if !self.admit_discretionary {
            return Ok(());
        }
        if self.queue.occupancy() >= BACKPRESSURE_OCCUPANCY {
            tracing::debug!(occupancy = self.queue.occupancy(), "deferring discretionary events under backpressure");
            return Ok(());
        }

        for agent in self.pacer.next_agents(self.agents.count) {
            self.maybe_decide(agent, now)?;
        }
        Ok(())
    }

    fn maybe_decide(&mut self, agent: AgentId, now: SimTime) -> SimResult<()> {
        let action = {
            let ctx = DecisionContext::new(now, &self.agents, &self.trends, &self.config);
            let rng = self.agent_rngs.get_mut(agent);
            self.decision_model.decide(agent, &ctx, rng)
        };
        let Some(action) = action else { return Ok(()) };

        let at = self.jittered(now);
        match action {
            Action::PublishPost { topic } => self.push_event(Some(agent), None, EventKind::PublishPost { topic }, at)?,
            Action::Purchase { level } => self.push_event(Some(agent), None, EventKind::Purchase { level }, at)?,
            Action::SelfDev => self.push_event(Some(agent), None, EventKind::SelfDev, at)?,
        }
        Ok(())
    }
}
