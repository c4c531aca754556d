//! Queue error types.

use thiserror::Error;

use ytagent_models::{ContentKind, JobValidationError};

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("{kind} queue is full ({capacity} jobs)")]
    Full { kind: ContentKind, capacity: usize },

    #[error("Invalid job: {0}")]
    InvalidJob(#[from] JobValidationError),

    #[error("Job kind {job} does not belong in the {queue} queue")]
    WrongKind { job: ContentKind, queue: ContentKind },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueueError {
    pub fn full(kind: ContentKind, capacity: usize) -> Self {
        Self::Full { kind, capacity }
    }

    /// True if the queue rejected the job for lack of room.
    pub fn is_full(&self) -> bool {
        matches!(self, QueueError::Full { .. })
    }
}
