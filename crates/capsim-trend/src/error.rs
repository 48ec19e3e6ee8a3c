use thiserror::Error;

use capsim_core::TrendId;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("trend {0} not found")]
    NotFound(TrendId),
}

pub type TrendResult<T> = Result<T, TrendError>;
