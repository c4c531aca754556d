//! In-memory upload queues.
//!
//! This crate provides:
//! - A bounded FIFO queue of upload jobs
//! - The pair of queues (videos, shorts) the agent dispatches from
//! - Seeding a queue from the media files in a folder

pub mod error;
pub mod folder;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use folder::{scan_folder, JobDefaults, VIDEO_EXTENSIONS};
pub use queue::{UploadQueue, UploadQueues, DEFAULT_MAX_QUEUE_SIZE};
