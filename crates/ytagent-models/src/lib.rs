//! Shared data models for the ytagent upload scheduler.
//!
//! This crate provides Serde-serializable types for:
//! - Upload jobs and their queue metadata
//! - Content kinds (regular videos and Shorts) and privacy settings
//! - Read-only projections of trending and search results

pub mod job;
pub mod trending;
pub mod validation;

// Re-export common types
pub use job::{
    CategoryId, ContentKind, JobId, PrivacyStatus, UploadJob, DEFAULT_CATEGORY_ID, SHORTS_HASHTAG,
};
pub use trending::{CategoryStats, HashtagResult, RelatedVideo, TrendingItem, UploadedVideo};
pub use validation::{validate_job, JobValidationError};
