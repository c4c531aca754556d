//! YouTube Data API v3 wire types.
//!
//! Only the fields the agent reads or writes are modelled; everything else in
//! the responses is ignored.

use serde::{Deserialize, Serialize};
use ytagent_models::UploadJob;

/// API cap on `maxResults` for list and search calls.
pub const MAX_RESULTS_LIMIT: u32 = 50;

// =============================================================================
// videos.insert
// =============================================================================

/// Request body for `videos.insert`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInsertBody {
    pub snippet: InsertSnippet,
    pub status: InsertStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSnippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertStatus {
    pub privacy_status: String,
    pub self_declared_made_for_kids: bool,
}

impl VideoInsertBody {
    /// Build the insert body for a queued job, applying Shorts marking.
    pub fn from_job(job: &UploadJob) -> Self {
        Self {
            snippet: InsertSnippet {
                title: job.title.clone(),
                description: job.upload_description().into_owned(),
                tags: job.tags.clone(),
                category_id: job.category_id.as_str().to_string(),
            },
            status: InsertStatus {
                privacy_status: job.privacy_status.as_str().to_string(),
                self_declared_made_for_kids: false,
            },
        }
    }

    /// Value of the `part` parameter matching the body.
    pub fn parts() -> &'static str {
        "snippet,status"
    }
}

/// The parts of an inserted video resource the client reads back.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertedVideo {
    pub id: String,
}

// =============================================================================
// videos.list
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoResource {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_id: String,
}

/// Counters arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
}

impl VideoResource {
    /// View count, zero when the channel hides it.
    pub fn view_count(&self) -> u64 {
        self.statistics
            .as_ref()
            .and_then(|s| s.view_count.as_deref())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

// =============================================================================
// search.list
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Sort order for `search.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    #[default]
    Relevance,
    ViewCount,
    Date,
    Rating,
}

impl SearchOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "relevance",
            SearchOrder::ViewCount => "viewCount",
            SearchOrder::Date => "date",
            SearchOrder::Rating => "rating",
        }
    }
}

/// Parameters of a video search.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Free-text query (keywords or a hashtag)
    pub query: Option<String>,
    /// Restrict to videos related to this one
    pub related_to_video_id: Option<String>,
    pub order: Option<SearchOrder>,
    pub max_results: u32,
}

impl SearchParams {
    pub fn query(q: impl Into<String>, max_results: u32) -> Self {
        Self {
            query: Some(q.into()),
            max_results,
            ..Default::default()
        }
    }

    pub fn related_to(video_id: impl Into<String>, max_results: u32) -> Self {
        Self {
            related_to_video_id: Some(video_id.into()),
            max_results,
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Query-string pairs for the request.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("maxResults", clamp_max_results(self.max_results).to_string()),
        ];
        if let Some(q) = &self.query {
            query.push(("q", q.clone()));
        }
        if let Some(id) = &self.related_to_video_id {
            query.push(("relatedToVideoId", id.clone()));
        }
        if let Some(order) = self.order {
            query.push(("order", order.as_str().to_string()));
        }
        query
    }
}

/// Keep `maxResults` inside the API's accepted range.
pub fn clamp_max_results(n: u32) -> u32 {
    n.clamp(1, MAX_RESULTS_LIMIT)
}
