//! Agent error types.

use thiserror::Error;

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Queue error: {0}")]
    Queue(#[from] ytagent_queue::QueueError),

    #[error("YouTube error: {0}")]
    Youtube(#[from] ytagent_youtube::YoutubeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the queue rejected a job for lack of room.
    pub fn is_queue_full(&self) -> bool {
        matches!(self, Self::Queue(e) if e.is_full())
    }
}
