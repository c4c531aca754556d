//! Trend analysis on top of the chart and search endpoints.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use ytagent_models::{CategoryStats, HashtagResult, RelatedVideo, TrendingItem};

use crate::client::YoutubeClient;
use crate::error::YoutubeResult;
use crate::types::{SearchOrder, SearchParams, MAX_RESULTS_LIMIT};

/// Chart category covering every category.
const ALL_CATEGORIES: &str = "0";

/// Read-only trend queries. Works with either API key or OAuth credentials.
#[derive(Clone)]
pub struct TrendAnalyzer {
    client: YoutubeClient,
}

impl TrendAnalyzer {
    pub fn new(client: YoutubeClient) -> Self {
        Self { client }
    }

    /// Most popular videos in a region, across all categories.
    pub async fn get_trending_topics(
        &self,
        region_code: &str,
        max_results: u32,
    ) -> YoutubeResult<Vec<TrendingItem>> {
        let videos = self
            .client
            .list_most_popular(region_code, max_results, Some(ALL_CATEGORIES))
            .await?;

        Ok(videos
            .into_iter()
            .map(|video| {
                let views = video.view_count();
                TrendingItem {
                    title: video.snippet.title,
                    tags: video.snippet.tags,
                    views,
                    category_id: video.snippet.category_id,
                }
            })
            .collect())
    }

    /// Video count and summed views per category over the top of the chart.
    pub async fn analyze_trending_categories(
        &self,
        region_code: &str,
    ) -> YoutubeResult<BTreeMap<String, CategoryStats>> {
        let videos = self
            .client
            .list_most_popular(region_code, MAX_RESULTS_LIMIT, Some(ALL_CATEGORIES))
            .await?;

        let mut categories: BTreeMap<String, CategoryStats> = BTreeMap::new();
        for video in &videos {
            categories
                .entry(video.snippet.category_id.clone())
                .or_default()
                .record(video.view_count());
        }

        debug!(
            region = region_code,
            videos = videos.len(),
            categories = categories.len(),
            "Analyzed trending categories"
        );
        Ok(categories)
    }

    /// Distinct tags on the most viewed videos matching `topic`, sorted.
    pub async fn get_keyword_suggestions(
        &self,
        topic: &str,
        max_results: u32,
    ) -> YoutubeResult<Vec<String>> {
        let params = SearchParams::query(topic, max_results).with_order(SearchOrder::ViewCount);
        let results = self.client.search(&params).await?;

        let keywords: BTreeSet<String> = results
            .into_iter()
            .flat_map(|r| r.snippet.tags)
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        Ok(keywords.into_iter().collect())
    }

    /// Videos related to `video_id`.
    pub async fn get_related_videos(
        &self,
        video_id: &str,
        max_results: u32,
    ) -> YoutubeResult<Vec<RelatedVideo>> {
        let results = self
            .client
            .search(&SearchParams::related_to(video_id, max_results))
            .await?;

        Ok(results
            .into_iter()
            .filter_map(|r| {
                let video_id = r.id.video_id?;
                Some(RelatedVideo {
                    title: r.snippet.title,
                    video_id,
                    thumbnail_url: r.snippet.thumbnails.default.map(|t| t.url),
                })
            })
            .collect())
    }

    /// Videos for a hashtag, by relevance.
    pub async fn search_by_hashtag(
        &self,
        hashtag: &str,
        max_results: u32,
    ) -> YoutubeResult<Vec<HashtagResult>> {
        let params = SearchParams::query(hashtag, max_results).with_order(SearchOrder::Relevance);
        let results = self.client.search(&params).await?;

        Ok(results
            .into_iter()
            .filter_map(|r| {
                let video_id = r.id.video_id?;
                Some(HashtagResult {
                    title: r.snippet.title,
                    description: r.snippet.description,
                    channel: r.snippet.channel_title,
                    video_id,
                })
            })
            .collect())
    }
}
