//! Fluent builder for constructing an [`Engine`].

use std::time::{Duration, SystemTime};

use capsim_agent::PersonStoreBuilder;
use capsim_behavior::{CapsimDecisionModel, DecisionModel, DefaultReachPolicy, ReachPolicy};
use capsim_core::{EventId, Profession, SimConfig, SimRng, SimTime, StopSignal};
use capsim_event::{Event, EventKind, EventQueue};
use capsim_repo::{BatchCommitter, CommitterConfig, PersonRecord, Repository, RetryPolicy};
use capsim_trend::TrendStore;

use crate::engine::Engine;
use crate::error::{SimError, SimResult};
use crate::shutdown::ShutdownController;

/// Fluent builder for [`Engine<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — population size, duration, seed, …
/// - `R: Repository` — the durable backend (or `InMemoryRepository` for
///   tests and demos)
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                    |
/// |----------------------|----------------------------------------------|
/// | `.professions(v)`    | Round-robin over `Profession::ALL`          |
/// | `.decision_model(m)` | [`CapsimDecisionModel`]                     |
/// | `.reach_policy(p)`   | [`DefaultReachPolicy`] at `fan_out_budget_per_minute` |
///
/// # Example
///
/// ```rust,ignore
/// use capsim_repo::InMemoryRepository;
/// use capsim_sim::EngineBuilder;
///
/// let mut engine = EngineBuilder::new(config, InMemoryRepository::new()).build()?;
/// engine.start()?;
/// ```
pub struct EngineBuilder<R: Repository> {
    config: SimConfig,
    repo: R,
    professions: Option<Vec<Profession>>,
    decision_model: Option<Box<dyn DecisionModel>>,
    reach_policy: Option<Box<dyn ReachPolicy>>,
}

impl<R: Repository> EngineBuilder<R> {
    pub fn new(config: SimConfig, repo: R) -> Self {
        Self {
            config,
            repo,
            professions: None,
            decision_model: None,
            reach_policy: None,
        }
    }

    /// Supply each agent's profession (must be length `config.num_agents`).
    ///
    /// If not called, professions are assigned round-robin over
    /// `Profession::ALL`.
    pub fn professions(mut self, professions: Vec<Profession>) -> Self {
        self.professions = Some(professions);
        self
    }

    /// Override the decision model. Defaults to [`CapsimDecisionModel`].
    pub fn decision_model(mut self, model: impl DecisionModel) -> Self {
        self.decision_model = Some(Box::new(model));
        self
    }

    /// Override the reach policy. Defaults to [`DefaultReachPolicy`] at
    /// `config.fan_out_budget_per_minute`.
    pub fn reach_policy(mut self, policy: impl ReachPolicy) -> Self {
        self.reach_policy = Some(Box::new(policy));
        self
    }

    /// Validate inputs, seed the population, register the run with the
    /// repository, and return a ready-to-run [`Engine`].
    pub fn build(mut self) -> SimResult<Engine<R>> {
        let agent_count = self.config.num_agents as usize;
        if agent_count == 0 {
            return Err(SimError::Config("num_agents must be at least 1".into()));
        }

        let professions = match self.professions {
            Some(p) => {
                if p.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got: p.len(),
                        what: "professions",
                    });
                }
                p
            }
            None => (0..agent_count).map(|i| Profession::ALL[i % Profession::ALL.len()]).collect(),
        };

        let (agents, agent_rngs) = PersonStoreBuilder::new(professions.clone(), self.config.rng_seed).build()?;

        let config_snapshot = format!("{:?}", self.config);
        let run_id =
            self.repo
                .create_run(self.config.num_agents, self.config.duration_days, &config_snapshot, SystemTime::now())?;

        let committer_config = CommitterConfig {
            batch_size: self.config.batch_size,
            batch_timeout: Duration::from_millis(self.config.batch_timeout_ms),
            realtime: self.config.realtime,
            retry: RetryPolicy {
                max_attempts: self.config.repo_retry_max_attempts,
                base_delay: Duration::from_millis(self.config.repo_retry_base_backoff_ms),
                ..RetryPolicy::default()
            },
            ..CommitterConfig::default()
        };
        let mut committer = BatchCommitter::new(self.repo, run_id, committer_config);
        for agent in agents.agent_ids() {
            committer.enqueue_person(PersonRecord {
                agent_id: agent,
                profession: agents.profession[agent.index()],
                meta: agents.meta[agent.index()].clone(),
            });
            committer.enqueue_participant(agent);
        }
        committer.flush_now(SimTime::ZERO)?;

        let stop = StopSignal::new();
        let clock = self.config.make_clock(stop.clone());
        let shutdown = ShutdownController::new(stop);

        let mut queue = EventQueue::new(self.config.max_queue_len);
        queue.push(Event::new(EventId(0), SimTime::ZERO, None, None, EventKind::DailyReset))?;
        queue.push(Event::new(EventId(1), SimTime::ZERO.offset(360.0), None, None, EventKind::EnergyRecovery))?;

        let decision_model = self.decision_model.take().unwrap_or_else(|| Box::new(CapsimDecisionModel));
        let reach_policy = self
            .reach_policy
            .take()
            .unwrap_or_else(|| Box::new(DefaultReachPolicy::new(self.config.fan_out_budget_per_minute)));
        let sim_rng = SimRng::new(self.config.rng_seed);

        Ok(Engine::new(
            self.config,
            clock,
            queue,
            agents,
            agent_rngs,
            TrendStore::new(),
            decision_model,
            reach_policy,
            committer,
            sim_rng,
            shutdown,
            run_id,
            2,
        ))
    }
}
