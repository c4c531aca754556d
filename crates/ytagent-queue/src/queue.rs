//! Bounded FIFO upload queues.

use std::collections::VecDeque;

use tracing::{debug, info};
use ytagent_models::{validate_job, ContentKind, UploadJob};

use crate::error::{QueueError, QueueResult};

/// Default capacity of each queue.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 100;

/// In-memory FIFO queue of pending uploads of one kind.
///
/// Nothing is persisted; the queue lives as long as the process.
#[derive(Debug, Clone)]
pub struct UploadQueue {
    kind: ContentKind,
    capacity: usize,
    jobs: VecDeque<UploadJob>,
}

impl UploadQueue {
    /// Create an empty queue that holds at most `capacity` jobs.
    pub fn new(kind: ContentKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            jobs: VecDeque::new(),
        }
    }

    /// Kind of job this queue accepts.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Maximum number of jobs.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a job at the back. Returns the new length.
    ///
    /// A full queue, a job of the wrong kind or invalid metadata leaves the
    /// queue untouched.
    pub fn enqueue(&mut self, job: UploadJob) -> QueueResult<usize> {
        if job.kind != self.kind {
            return Err(QueueError::WrongKind {
                job: job.kind,
                queue: self.kind,
            });
        }

        validate_job(&job)?;

        if self.jobs.len() >= self.capacity {
            return Err(QueueError::full(self.kind, self.capacity));
        }

        info!(
            job_id = %job.job_id,
            kind = %self.kind,
            "Added to {} queue: {}", self.kind, job.title
        );
        self.jobs.push_back(job);
        Ok(self.jobs.len())
    }

    /// Remove and return the oldest job, if any.
    pub fn pop_next(&mut self) -> Option<UploadJob> {
        let job = self.jobs.pop_front();
        if let Some(job) = &job {
            debug!(job_id = %job.job_id, kind = %self.kind, remaining = self.jobs.len(), "Dequeued job");
        }
        job
    }

    /// Oldest job without removing it.
    pub fn peek(&self) -> Option<&UploadJob> {
        self.jobs.front()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs from front (next to upload) to back.
    pub fn iter(&self) -> impl Iterator<Item = &UploadJob> {
        self.jobs.iter()
    }
}

/// The two queues the agent dispatches from.
#[derive(Debug, Clone)]
pub struct UploadQueues {
    pub videos: UploadQueue,
    pub shorts: UploadQueue,
}

impl UploadQueues {
    /// Create both queues with the same capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            videos: UploadQueue::new(ContentKind::Video, capacity),
            shorts: UploadQueue::new(ContentKind::Short, capacity),
        }
    }

    /// Queue for the given kind.
    pub fn get(&self, kind: ContentKind) -> &UploadQueue {
        match kind {
            ContentKind::Video => &self.videos,
            ContentKind::Short => &self.shorts,
        }
    }

    /// Mutable queue for the given kind.
    pub fn get_mut(&mut self, kind: ContentKind) -> &mut UploadQueue {
        match kind {
            ContentKind::Video => &mut self.videos,
            ContentKind::Short => &mut self.shorts,
        }
    }

    /// Route a job to the queue matching its kind.
    pub fn enqueue(&mut self, job: UploadJob) -> QueueResult<usize> {
        self.get_mut(job.kind).enqueue(job)
    }
}

impl Default for UploadQueues {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUEUE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str) -> UploadJob {
        UploadJob::new(ContentKind::Video, format!("videos/{}.mp4", title), title, "desc")
    }

    fn short(title: &str) -> UploadJob {
        UploadJob::new(ContentKind::Short, format!("shorts/{}.mp4", title), title, "desc")
    }

    #[test]
    fn test_enqueue_increases_length_by_one() {
        let mut queue = UploadQueue::new(ContentKind::Video, 10);
        assert_eq!(queue.enqueue(video("a")).unwrap(), 1);
        assert_eq!(queue.enqueue(video("b")).unwrap(), 2);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_pop_on_empty_queue() {
        let mut queue = UploadQueue::new(ContentKind::Short, 10);
        assert!(queue.pop_next().is_none());
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fifo_order_preserved() {
        let mut queue = UploadQueue::new(ContentKind::Video, 10);
        for title in ["first", "second", "third"] {
            queue.enqueue(video(title)).unwrap();
        }

        let iterated: Vec<_> = queue.iter().map(|j| j.title.clone()).collect();
        assert_eq!(iterated, ["first", "second", "third"]);
        assert_eq!(queue.peek().map(|j| j.title.as_str()), Some("first"));

        let popped: Vec<_> = std::iter::from_fn(|| queue.pop_next())
            .map(|j| j.title)
            .collect();
        assert_eq!(popped, ["first", "second", "third"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_rejects_and_keeps_contents() {
        let mut queue = UploadQueue::new(ContentKind::Video, 2);
        queue.enqueue(video("a")).unwrap();
        queue.enqueue(video("b")).unwrap();

        let err = queue.enqueue(video("c")).unwrap_err();
        assert!(err.is_full());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().map(|j| j.title.as_str()), Some("a"));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let mut queue = UploadQueue::new(ContentKind::Video, 2);
        let err = queue.enqueue(short("s")).unwrap_err();
        assert!(matches!(err, QueueError::WrongKind { .. }));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_invalid_job_rejected() {
        let mut queue = UploadQueue::new(ContentKind::Video, 2);
        let err = queue.enqueue(video("")).unwrap_err();
        assert!(matches!(err, QueueError::InvalidJob(_)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queues_route_by_kind() {
        let mut queues = UploadQueues::default();
        queues.enqueue(video("v")).unwrap();
        queues.enqueue(short("s1")).unwrap();
        queues.enqueue(short("s2")).unwrap();

        assert_eq!(queues.get(ContentKind::Video).len(), 1);
        assert_eq!(queues.get(ContentKind::Short).len(), 2);
        assert_eq!(queues.videos.capacity(), DEFAULT_MAX_QUEUE_SIZE);
    }
}
