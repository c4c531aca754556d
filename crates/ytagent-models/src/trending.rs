//! Read-only projections of YouTube listing and search responses.
//!
//! None of these are stored; they are built from a single API response and
//! handed back to the caller.

use serde::{Deserialize, Serialize};

/// A video from the trending ("most popular") chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingItem {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub views: u64,
    pub category_id: String,
}

/// Aggregate of trending videos that share a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Number of trending videos in the category
    pub count: u32,
    /// Sum of their view counts
    pub total_views: u64,
}

impl CategoryStats {
    /// Add one video to the aggregate.
    pub fn record(&mut self, views: u64) {
        self.count += 1;
        self.total_views = self.total_views.saturating_add(views);
    }

    /// Mean views per video, zero for an empty aggregate.
    pub fn average_views(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.total_views / u64::from(self.count)
        }
    }
}

/// A video related to another one, for content ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedVideo {
    pub title: String,
    pub video_id: String,
    pub thumbnail_url: Option<String>,
}

/// A search hit for a hashtag query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagResult {
    pub title: String,
    pub description: String,
    pub channel: String,
    pub video_id: String,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedVideo {
    pub video_id: String,
}

impl UploadedVideo {
    /// Public watch URL of the uploaded video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_stats_record() {
        let mut stats = CategoryStats::default();
        stats.record(100);
        stats.record(300);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_views, 400);
        assert_eq!(stats.average_views(), 200);
    }

    #[test]
    fn test_category_stats_empty_average() {
        assert_eq!(CategoryStats::default().average_views(), 0);
    }

    #[test]
    fn test_watch_url() {
        let video = UploadedVideo {
            video_id: "abc123".to_string(),
        };
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=abc123");
    }
}
