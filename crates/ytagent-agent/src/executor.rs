//! Polling loop that drives the agent.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::agent::UploadAgent;
use crate::platform::VideoPlatform;

/// Trending videos fetched per monitor check.
const TRENDING_SAMPLE_SIZE: u32 = 50;

/// Shortest accepted loop period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Stops a running [`AgentRunner`] from another task.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }
}

/// Runs the agent: checks due triggers every poll interval and watches the
/// trending chart. Uploads run inline, one at a time.
pub struct AgentRunner<P> {
    agent: UploadAgent<P>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl<P: VideoPlatform> AgentRunner<P> {
    pub fn new(agent: UploadAgent<P>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            agent,
            shutdown: Arc::new(shutdown),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown))
    }

    /// Signal shutdown. Takes effect even before `run` starts.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn agent(&self) -> &UploadAgent<P> {
        &self.agent
    }

    /// Run until shutdown is signalled. An upload in progress when the signal
    /// arrives completes before the loop exits.
    pub async fn run(&mut self) {
        let mut shutdown_rx = self.shutdown.subscribe();
        if *shutdown_rx.borrow() {
            info!("Shutdown requested before start");
            return;
        }

        let config = self.agent.config();
        info!(
            poll_secs = config.poll_interval.as_secs(),
            trending_secs = config.trending_check_interval.as_secs(),
            "YouTube upload agent started: {}",
            self.agent.status()
        );

        let mut poll = tokio::time::interval(config.poll_interval.max(MIN_PERIOD));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut trending = tokio::time::interval(config.trending_check_interval.max(MIN_PERIOD));
        trending.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping agent");
                        break;
                    }
                }
                _ = poll.tick() => {
                    self.poll_schedule().await;
                }
                _ = trending.tick() => {
                    self.check_trending().await;
                }
            }
        }

        info!("Upload agent stopped: {}", self.agent.status());
    }

    async fn poll_schedule(&mut self) {
        let report = self.agent.run_pending(Local::now().naive_local()).await;
        if !report.is_idle() {
            info!(
                uploaded = report.uploaded.len(),
                empty = report.empty,
                failed = report.failed,
                "Scheduled uploads dispatched"
            );
        }
    }

    /// Log the trending videos at or above the view threshold. Returns how
    /// many there were; a failed check counts as none.
    pub async fn check_trending(&self) -> usize {
        let config = self.agent.config();
        let items = match self
            .agent
            .get_trending_topics(&config.default_region, TRENDING_SAMPLE_SIZE)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!("Trending check failed: {}", e);
                return 0;
            }
        };

        let hot: Vec<_> = items
            .iter()
            .filter(|item| item.views >= config.min_views_threshold)
            .collect();

        for item in &hot {
            info!(
                views = item.views,
                category = %item.category_id,
                "Trending: {}", item.title
            );
        }
        info!(
            region = %config.default_region,
            checked = items.len(),
            above_threshold = hot.len(),
            "Trending check complete"
        );
        hot.len()
    }
}
