//! `capsim-repo` — the `Repository` trait, row types, and batched commit
//! path for durable CAPSIM persistence.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`Repository`] | durable-store façade (spec.md §4.6); the core engine calls only through this trait |
//! | [`InMemoryRepository`] | in-process fake, for tests and demos |
//! | [`SqliteRepository`] | durable backend behind the `sqlite` feature |
//! | [`BatchCommitter`] | buffers rows and flushes them to a `Repository` on a size-or-time trigger (spec.md §4.7) |
//!
//! # Usage
//!
//! ```rust,ignore
//! use capsim_repo::{BatchCommitter, CommitterConfig, InMemoryRepository};
//!
//! let mut repo = InMemoryRepository::new();
//! let run_id = repo.create_run(100, 30, "{}", std::time::SystemTime::now())?;
//! let mut committer = BatchCommitter::new(repo, run_id, CommitterConfig::default());
//! committer.enqueue_event(&event);
//! committer.maybe_flush(now)?;
//! ```

pub mod committer;
pub mod error;
pub mod memory;
pub mod repository;
pub mod row;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use committer::{BatchCommitter, CommitterConfig, RetryPolicy};
pub use error::{RepoError, RepoResult};
pub use memory::InMemoryRepository;
pub use repository::Repository;
pub use row::{EventRow, ParticipantRecord, PersonRecord, RunRecord};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
