//! The engine's error type.
//!
//! spec.md §7 draws a line between config errors (pre-loop, the run is
//! never marked `Running`), invariant violations (fatal, best-effort flush,
//! marked `Failed`), and everything a collaborating crate already reports
//! through its own error type — those are wrapped here with `#[from]`
//! rather than re-described.

use thiserror::Error;

use capsim_behavior::BehaviorError;
use capsim_event::EventError;
use capsim_reference::ReferenceError;
use capsim_repo::RepoError;
use capsim_trend::TrendError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected before the run ever starts — `Status().phase` stays
    /// `Initialized`, never `Running`.
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got: usize,
        what: &'static str,
    },

    /// One of I1-I6 broken. Fatal: the engine attempts a best-effort flush
    /// and marks the run `Failed`.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Trend(#[from] TrendError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type SimResult<T> = Result<T, SimError>;
