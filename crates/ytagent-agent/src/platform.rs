//! The remote video platform as seen by the agent.

use async_trait::async_trait;
use ytagent_models::{TrendingItem, UploadJob, UploadedVideo};
use ytagent_youtube::{TrendAnalyzer, YoutubeClient, YoutubeResult};

/// Uploads and trending queries. Implemented by the YouTube client and by
/// in-memory stand-ins in tests.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    async fn upload(&self, job: &UploadJob) -> YoutubeResult<UploadedVideo>;

    async fn trending(&self, region_code: &str, max_results: u32) -> YoutubeResult<Vec<TrendingItem>>;
}

/// YouTube Data API backed platform.
#[derive(Clone)]
pub struct YoutubePlatform {
    client: YoutubeClient,
    trends: TrendAnalyzer,
}

impl YoutubePlatform {
    pub fn new(client: YoutubeClient) -> Self {
        Self {
            trends: TrendAnalyzer::new(client.clone()),
            client,
        }
    }
}

#[async_trait]
impl VideoPlatform for YoutubePlatform {
    async fn upload(&self, job: &UploadJob) -> YoutubeResult<UploadedVideo> {
        self.client.insert_video(job).await
    }

    async fn trending(&self, region_code: &str, max_results: u32) -> YoutubeResult<Vec<TrendingItem>> {
        self.trends.get_trending_topics(region_code, max_results).await
    }
}
