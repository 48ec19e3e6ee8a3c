//! Framework error type.
//!
//! Sub-crates define their own error enums and convert them into `CoreError`
//! via `From` impls, or keep them separate and wrap `CoreError` as one
//! variant. Both patterns are acceptable; prefer whichever keeps error sites
//! clean.

use thiserror::Error;

use crate::{AgentId, RunId, TrendId};

/// The top-level error type for `capsim-core` and a common base for
/// sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("run {0} not found")]
    RunNotFound(RunId),

    #[error("trend {0} not found")]
    TrendNotFound(TrendId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `capsim-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
