//! The `Repository` trait — durable-store façade (C7), matching spec.md
//! §4.6's operation table exactly.
//!
//! Implementations (an in-memory fake for tests, an SQLite-backed store
//! behind the `sqlite` feature) are external collaborators: the core engine
//! only ever calls through this trait. Every op is a short, retryable unit —
//! the engine holds no long-lived transaction across calls.

use std::time::SystemTime;

use capsim_agent::AttributeHistoryRow;
use capsim_core::{AgentId, RunId, RunStatus, SimTime};
use capsim_reference::{AffinityRow, AttributeRangeRow, InterestRangeRow};
use capsim_trend::Trend;

use crate::error::RepoResult;
use crate::row::{EventRow, PersonRecord, RunRecord};

/// Durable persistence operations required by the simulation core.
///
/// # Failure contract
///
/// Each op either fully succeeds or returns a [`RepoError`][crate::RepoError]
/// classified as transient or permanent (spec.md §7). None of these methods
/// are called concurrently — the engine and its `BatchCommitter` run on a
/// single task (spec.md §5).
pub trait Repository: Send {
    /// Create a run and return its identity. Durable once this returns `Ok`.
    /// `started_at` is the wall-clock instant the caller observed just
    /// before calling this, not a value the repository derives itself —
    /// keeps the repository free of a live clock dependency for tests.
    fn create_run(
        &mut self,
        num_agents: u32,
        duration_days: u32,
        config_snapshot: &str,
        started_at: SystemTime,
    ) -> RepoResult<RunId>;

    /// Load a run's current row, for post-run inspection or a round-trip
    /// check against what `create_run`/`mark_run_terminal` wrote.
    fn load_run(&mut self, run_id: RunId) -> RepoResult<RunRecord>;

    /// Upsert a batch of agent records. Atomic per batch.
    fn bulk_upsert_persons(&mut self, persons: &[PersonRecord]) -> RepoResult<()>;

    /// Bind an agent to a run. Unique per (run_id, agent_id) pair.
    fn create_participant(&mut self, run_id: RunId, agent_id: AgentId) -> RepoResult<()>;

    /// Append a batch of event rows. Atomic; order within the batch matches
    /// the input slice's order.
    fn append_events(&mut self, events: &[EventRow]) -> RepoResult<()>;

    /// Append a batch of attribute-history rows. Atomic.
    fn append_attribute_history(&mut self, rows: &[AttributeHistoryRow]) -> RepoResult<()>;

    /// Upsert a batch of trend rows. Last-write-wins on counters
    /// (`total_interactions`, `coverage`).
    fn upsert_trends(&mut self, run_id: RunId, trends: &[Trend]) -> RepoResult<()>;

    /// The static (profession, topic) affinity matrix.
    fn load_affinity_map(&mut self) -> RepoResult<Vec<AffinityRow>>;

    /// Per-profession min/max per interest category.
    fn load_interest_ranges(&mut self) -> RepoResult<Vec<InterestRangeRow>>;

    /// Per-profession min/max per scalar attribute.
    fn load_attribute_ranges(&mut self) -> RepoResult<Vec<AttributeRangeRow>>;

    /// Mark a run terminal (`Completed` or `Failed`). Durable once `Ok`.
    /// `end_time` is the sim-time the run reached; `ended_at` is the
    /// wall-clock instant observed by the caller.
    fn mark_run_terminal(
        &mut self,
        run_id: RunId,
        status: RunStatus,
        end_time: SimTime,
        ended_at: SystemTime,
    ) -> RepoResult<()>;
}

