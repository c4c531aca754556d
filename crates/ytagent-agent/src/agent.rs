//! Upload agent: queues, schedule and dispatch.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{info, warn, Instrument};
use ytagent_models::{CategoryId, ContentKind, TrendingItem, UploadJob, UploadedVideo};
use ytagent_queue::{scan_folder, QueueError, UploadQueues};

use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult};
use crate::logging::JobLogger;
use crate::metrics::{record_upload, UploadResultLabel};
use crate::platform::VideoPlatform;
use crate::schedule::{Schedule, Trigger};

/// What a trigger dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    WeeklyVideo,
    DailyShort,
}

impl Slot {
    pub fn kind(&self) -> ContentKind {
        match self {
            Slot::WeeklyVideo => ContentKind::Video,
            Slot::DailyShort => ContentKind::Short,
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            Slot::WeeklyVideo => "weekly_video_upload",
            Slot::DailyShort => "daily_short_upload",
        }
    }
}

/// Result of dispatching one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(UploadedVideo),
    /// Nothing was queued; no upload was attempted.
    QueueEmpty,
}

/// Tally of one `run_pending` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub uploaded: Vec<UploadedVideo>,
    pub empty: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn is_idle(&self) -> bool {
        self.uploaded.is_empty() && self.empty == 0 && self.failed == 0
    }
}

/// Snapshot of the agent's queues and schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatus {
    pub videos_queued: usize,
    pub shorts_queued: usize,
    pub scheduled_triggers: usize,
    pub next_run: Option<NaiveDateTime>,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} videos and {} shorts queued, {} triggers",
            self.videos_queued, self.shorts_queued, self.scheduled_triggers
        )?;
        if let Some(next) = self.next_run {
            write!(f, ", next run {}", next.format("%Y-%m-%d %H:%M"))?;
        }
        Ok(())
    }
}

/// Owns the two upload queues and the trigger schedule, and dispatches
/// uploads to the platform.
pub struct UploadAgent<P> {
    platform: P,
    config: AgentConfig,
    queues: UploadQueues,
    schedule: Schedule<Slot>,
}

impl<P: VideoPlatform> UploadAgent<P> {
    pub fn new(platform: P, config: AgentConfig) -> Self {
        Self {
            platform,
            queues: UploadQueues::new(config.max_queue_size),
            schedule: Schedule::new(),
            config,
        }
    }

    // =========================================================================
    // Queueing
    // =========================================================================

    /// Queue a regular video. `category` falls back to the configured default.
    pub fn add_to_video_queue(
        &mut self,
        file_path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
        category: Option<CategoryId>,
    ) -> AgentResult<usize> {
        let job = UploadJob::new(ContentKind::Video, file_path, title, description)
            .with_tags(tags)
            .with_category(category.unwrap_or_else(|| self.config.default_category.clone()))
            .with_privacy(self.config.default_privacy);
        self.enqueue(job)
    }

    /// Queue a short with the default category.
    pub fn add_to_shorts_queue(
        &mut self,
        file_path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> AgentResult<usize> {
        let job = UploadJob::new(ContentKind::Short, file_path, title, description)
            .with_tags(tags)
            .with_category(self.config.default_category.clone())
            .with_privacy(self.config.default_privacy);
        self.enqueue(job)
    }

    /// Queue a prepared job on the queue matching its kind.
    pub fn enqueue(&mut self, job: UploadJob) -> AgentResult<usize> {
        Ok(self.queues.enqueue(job)?)
    }

    /// Queue every video file found in the configured folders.
    ///
    /// Files whose derived metadata fails validation are skipped. Seeding a
    /// kind stops at the first full queue. Returns the number of jobs added.
    pub fn seed_from_folders(&mut self) -> AgentResult<usize> {
        let defaults = self.config.job_defaults();
        let folders = [
            (ContentKind::Video, self.config.video_folder.clone()),
            (ContentKind::Short, self.config.shorts_folder.clone()),
        ];

        let mut added = 0;
        for (kind, folder) in folders {
            for job in scan_folder(&folder, kind, &defaults)? {
                let logger = JobLogger::new(&job, "seed_from_folder");
                let file = job.file_path.clone();
                match self.enqueue(job) {
                    Ok(_) => added += 1,
                    Err(AgentError::Queue(QueueError::InvalidJob(e))) => {
                        logger.log_warning(&format!("Skipping {}: {}", file.display(), e));
                    }
                    Err(e) if e.is_queue_full() => {
                        warn!(kind = kind.as_str(), "Stopped seeding from {}: {}", folder.display(), e);
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(added)
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Register the weekly video and daily shorts triggers, replacing any
    /// registered before.
    pub fn schedule_uploads(&mut self, now: NaiveDateTime) {
        self.schedule.clear();

        for &weekday in &self.config.weekly_video_days {
            self.schedule.every(
                Trigger::Weekly {
                    weekday,
                    at: self.config.weekly_video_time,
                },
                Slot::WeeklyVideo,
                now,
            );
        }
        for &at in &self.config.shorts_schedule {
            self.schedule.every(Trigger::Daily { at }, Slot::DailyShort, now);
        }

        info!(
            weekly_videos = self.config.weekly_video_days.len(),
            daily_shorts = self.config.shorts_schedule.len(),
            "Upload schedule initialized"
        );
        for job in self.schedule.jobs() {
            info!(slot = ?job.target, next_run = %job.next_run, "Scheduled {}", job.trigger);
        }
    }

    /// Dispatch every due trigger. Failed uploads are logged and dropped.
    pub async fn run_pending(&mut self, now: NaiveDateTime) -> RunReport {
        let mut report = RunReport::default();

        for slot in self.schedule.run_pending(now) {
            match self.dispatch(slot).await {
                Ok(UploadOutcome::Uploaded(video)) => report.uploaded.push(video),
                Ok(UploadOutcome::QueueEmpty) => report.empty += 1,
                Err(e) => {
                    warn!(slot = ?slot, "Scheduled upload failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    // =========================================================================
    // Uploading
    // =========================================================================

    /// Upload the next queued regular video.
    pub async fn upload_weekly_video(&mut self) -> AgentResult<UploadOutcome> {
        self.dispatch(Slot::WeeklyVideo).await
    }

    /// Upload the next queued short.
    pub async fn upload_daily_short(&mut self) -> AgentResult<UploadOutcome> {
        self.dispatch(Slot::DailyShort).await
    }

    async fn dispatch(&mut self, slot: Slot) -> AgentResult<UploadOutcome> {
        let kind = slot.kind();
        let Some(job) = self.queues.get_mut(kind).pop_next() else {
            warn!(kind = kind.as_str(), "No {}s in queue!", kind);
            record_upload(kind, UploadResultLabel::QueueEmpty);
            return Ok(UploadOutcome::QueueEmpty);
        };

        let remaining = self.queues.get(kind).len();
        let logger = JobLogger::new(&job, slot.operation());
        let span = logger.create_span();

        async {
            logger.log_start(&format!("Uploading {}: {}", kind, job.title));
            logger.log_progress(&format!("{} more {}s queued", remaining, kind));

            match self.platform.upload(&job).await {
                Ok(video) => {
                    logger.log_completion(&format!("Uploaded as {}", video.watch_url()));
                    record_upload(kind, UploadResultLabel::Uploaded);
                    Ok(UploadOutcome::Uploaded(video))
                }
                Err(e) => {
                    logger.log_error(&format!("Upload of {} failed: {}", job.file_path.display(), e));
                    record_upload(kind, UploadResultLabel::Failed);
                    Err(AgentError::from(e))
                }
            }
        }
        .instrument(span)
        .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Most popular videos in a region.
    pub async fn get_trending_topics(
        &self,
        region_code: &str,
        max_results: u32,
    ) -> AgentResult<Vec<TrendingItem>> {
        Ok(self.platform.trending(region_code, max_results).await?)
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            videos_queued: self.queues.get(ContentKind::Video).len(),
            shorts_queued: self.queues.get(ContentKind::Short).len(),
            scheduled_triggers: self.schedule.len(),
            next_run: self.schedule.next_run(),
        }
    }

    pub fn queues(&self) -> &UploadQueues {
        &self.queues
    }

    pub fn schedule(&self) -> &Schedule<Slot> {
        &self.schedule
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}
