use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error(transparent)]
    Agent(#[from] capsim_agent::AgentError),
    #[error(transparent)]
    Trend(#[from] capsim_trend::TrendError),
    #[error(transparent)]
    Reference(#[from] capsim_reference::ReferenceError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
