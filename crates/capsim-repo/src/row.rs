//! Plain data row types passed to [`Repository`][crate::Repository] operations.
//!
//! `capsim_trend::Trend` and `capsim_agent::AttributeHistoryRow` already
//! model exactly the persisted shape spec.md §3 describes, so they are
//! reused directly rather than duplicated here.

use std::time::SystemTime;

use capsim_agent::PersonMeta;
use capsim_core::{AgentId, EventId, Profession, RunId, RunStatus, SimTime, TrendId};

/// One row of the `persons` collection: global agent identity plus the
/// immutable metadata and profession fixed at creation.
#[derive(Clone, Debug)]
pub struct PersonRecord {
    pub agent_id: AgentId,
    pub profession: Profession,
    pub meta: PersonMeta,
}

/// One row of the `participants` collection: an agent bound to a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParticipantRecord {
    pub run_id: RunId,
    pub agent_id: AgentId,
}

/// One row of the `events` collection, flattened for persistence.
///
/// `capsim_event::Event` carries `processed_at: Option<std::time::Instant>`
/// for in-process latency bookkeeping; `Instant` has no portable wall-clock
/// representation, so the persisted row keeps only the duration and drops
/// the instant itself.
#[derive(Clone, Debug)]
pub struct EventRow {
    pub event_id: EventId,
    pub run_id: RunId,
    pub kind_label: &'static str,
    pub priority: i32,
    pub timestamp: SimTime,
    pub agent_id: Option<AgentId>,
    pub trend_id: Option<TrendId>,
    pub processing_duration_ms: Option<u64>,
}

impl EventRow {
    pub fn from_event(run_id: RunId, event: &capsim_event::Event) -> Self {
        Self {
            event_id: event.id,
            run_id,
            kind_label: event.kind.label(),
            priority: event.priority,
            timestamp: event.timestamp,
            agent_id: event.agent_id,
            trend_id: event.trend_id,
            processing_duration_ms: event.processing_duration.map(|d| d.as_millis() as u64),
        }
    }
}

/// One row of the `runs` collection.
#[derive(Clone, Debug)]
pub struct RunRecord {
    pub run_id: RunId,
    pub num_agents: u32,
    pub duration_days: u32,
    pub status: RunStatus,
    /// Free-form configuration snapshot, serialized by the caller (spec.md
    /// §3 calls the run's configuration field "free-form", so this crate
    /// does not impose a schema on it).
    pub config_snapshot: String,
    /// Wall-clock instant the run was created, distinct from any
    /// `SimTime` — the run's nominal duration is in simulated days, but
    /// callers (and a human operator) also want to know how long the
    /// execution itself actually took on the wall clock.
    pub started_at: SystemTime,
    /// Set once on `mark_run_terminal`; `None` while the run is still live.
    pub ended_at: Option<SystemTime>,
    /// Sim-time the run reached when it went terminal.
    pub end_sim_minute: Option<SimTime>,
}
