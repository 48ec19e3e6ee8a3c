use thiserror::Error;

use capsim_core::AgentId;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} not found in population")]
    NotFound(AgentId),
    #[error(transparent)]
    Reference(#[from] capsim_reference::ReferenceError),
}

pub type AgentResult<T> = Result<T, AgentError>;
