//! In-memory platform for agent and runner tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ytagent_models::{TrendingItem, UploadJob, UploadedVideo};
use ytagent_youtube::{YoutubeError, YoutubeResult};

use crate::platform::VideoPlatform;

#[derive(Default)]
pub struct StubPlatform {
    fail_uploads: bool,
    upload_delay: Option<Duration>,
    uploaded: Mutex<Vec<UploadJob>>,
    trending_calls: AtomicU32,
}

impl StubPlatform {
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Uploads take `delay` before completing.
    pub fn slow(delay: Duration) -> Self {
        Self {
            upload_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn uploaded(&self) -> Vec<UploadJob> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn trending_calls(&self) -> u32 {
        self.trending_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoPlatform for StubPlatform {
    async fn upload(&self, job: &UploadJob) -> YoutubeResult<UploadedVideo> {
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_uploads {
            return Err(YoutubeError::ServerError(503, "backend unavailable".to_string()));
        }
        let mut uploaded = self.uploaded.lock().unwrap();
        uploaded.push(job.clone());
        Ok(UploadedVideo {
            video_id: format!("stub-{}", uploaded.len()),
        })
    }

    async fn trending(&self, _region_code: &str, _max_results: u32) -> YoutubeResult<Vec<TrendingItem>> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            TrendingItem {
                title: "Viral".to_string(),
                tags: vec!["viral".to_string()],
                views: 2_000_000,
                category_id: "24".to_string(),
            },
            TrendingItem {
                title: "Niche".to_string(),
                tags: Vec::new(),
                views: 900,
                category_id: "28".to_string(),
            },
        ])
    }
}
