use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("event queue full: {max_len} resident events")]
    QueueFull { max_len: usize },
}

pub type EventResult<T> = Result<T, EventError>;
