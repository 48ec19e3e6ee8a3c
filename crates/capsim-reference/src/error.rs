//! Errors for the reference-table crate.

use thiserror::Error;

use capsim_core::{Profession, Topic};

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("no affinity entry for (topic={0}, profession={1})")]
    MissingAffinity(Topic, Profession),

    #[error("no attribute range entry for profession {0}")]
    MissingAttributeRange(Profession),

    #[error("no interest range entry for profession {0}")]
    MissingInterestRange(Profession),
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;
