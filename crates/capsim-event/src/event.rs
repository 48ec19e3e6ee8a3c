//! The closed event-kind vocabulary and the
//! `Event` record that flows through the queue.

use std::time::{Duration, Instant};

use capsim_core::{AgentId, EventId, SimTime, Topic, TrendId};

/// Priority band. Lower sorts earlier.
pub const PRIORITY_SYSTEM: i32 = 100;
pub const PRIORITY_AGENT_ACTION: i32 = 50;
pub const PRIORITY_LOW: i32 = 0;

/// The closed set of event kinds. Modeled as a tagged variant
/// rather than a class hierarchy: kind-specific data lives directly on the
/// variant instead of behind a generic "opaque payload" field, so a new
/// event kind cannot be constructed without supplying its required data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// Scheduler system event, at sim-time 0, 1440, 2880, ...
    DailyReset,
    /// Scheduler system event, every 360 sim-minutes.
    EnergyRecovery,
    /// Scheduler system event, each day boundary.
    SaveDailyTrends,
    /// Agent decision: publish a new trend on `topic`.
    PublishPost { topic: Topic },
    /// Agent decision: purchase at `level`.
    Purchase { level: u32 },
    /// Agent decision: self-development.
    SelfDev,
    /// Emitted on publish, one per exposed agent candidate.
    TrendInfluence,
}

impl EventKind {
    /// The kind's fixed priority band.
    pub fn priority(&self) -> i32 {
        match self {
            EventKind::DailyReset | EventKind::EnergyRecovery | EventKind::SaveDailyTrends => {
                PRIORITY_SYSTEM
            }
            EventKind::PublishPost { .. }
            | EventKind::Purchase { .. }
            | EventKind::SelfDev
            | EventKind::TrendInfluence => PRIORITY_AGENT_ACTION,
        }
    }

    /// Short label, used for structured logs and persisted `event kind`.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::DailyReset => "daily_reset",
            EventKind::EnergyRecovery => "energy_recovery",
            EventKind::SaveDailyTrends => "save_daily_trends",
            EventKind::PublishPost { .. } => "publish_post",
            EventKind::Purchase { .. } => "purchase",
            EventKind::SelfDev => "self_dev",
            EventKind::TrendInfluence => "trend_influence",
        }
    }
}

/// An entry in the event queue.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub id: EventId,
    /// `(priority, timestamp, seq)` is the engine's total order.
    pub priority: i32,
    pub timestamp: SimTime,
    pub seq: u64,
    pub agent_id: Option<AgentId>,
    pub trend_id: Option<TrendId>,
    pub kind: EventKind,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub processed_at: Option<Instant>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub processing_duration: Option<Duration>,
}

impl Event {
    /// Build an event; `priority` is derived from `kind`, `seq` is assigned
    /// by the queue on push.
    pub fn new(
        id: EventId,
        timestamp: SimTime,
        agent_id: Option<AgentId>,
        trend_id: Option<TrendId>,
        kind: EventKind,
    ) -> Self {
        Self {
            id,
            priority: kind.priority(),
            timestamp,
            seq: 0,
            agent_id,
            trend_id,
            kind,
            processed_at: None,
            processing_duration: None,
        }
    }

    /// The sort key used by the queue: `(priority, timestamp, seq)`.
    #[inline]
    pub fn sort_key(&self) -> (i32, SimTime, u64) {
        (self.priority, self.timestamp, self.seq)
    }

    /// `HH:MM` derived from `timestamp` modulo 1440 minutes/day, matching
    /// the persisted `action_timestamp` contract.
    pub fn action_timestamp(&self) -> String {
        self.timestamp.as_hhmm()
    }
}
