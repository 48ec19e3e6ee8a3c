//! Error types for capsim-repo.
//!
//! spec.md §7 classifies repository failures as either transient (retried
//! with backoff by the committer) or permanent (immediate fatal). `is_transient`
//! is the classification hook the committer calls on every failed op.

use thiserror::Error;

use capsim_core::RunId;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("run {0} not found")]
    RunNotFound(RunId),

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Reference(#[from] capsim_reference::ReferenceError),

    /// A storage failure the caller has classified as retryable (lock
    /// contention, connection hiccup, timeout).
    #[error("transient storage error: {0}")]
    Transient(String),

    /// A storage failure that will not resolve on retry (constraint
    /// violation, corrupted state, disk full).
    #[error("permanent storage error: {0}")]
    Permanent(String),
}

impl RepoError {
    /// Whether the committer should retry the operation that produced this
    /// error with exponential backoff (spec.md §7 item 3), as opposed to
    /// escalating immediately (§7 item 4).
    pub fn is_transient(&self) -> bool {
        match self {
            RepoError::Transient(_) => true,
            #[cfg(feature = "sqlite")]
            RepoError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
