//! Upload job definitions.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// YouTube category "People & Blogs".
pub const DEFAULT_CATEGORY_ID: &str = "22";

/// Hashtag that marks an upload as a Short.
pub const SHORTS_HASHTAG: &str = "#Shorts";

/// Unique identifier for an upload job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content an upload job carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Regular long-form video
    Video,
    /// Vertical short-form video
    Short,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Video => "video",
            ContentKind::Short => "short",
        }
    }

    pub fn is_short(&self) -> bool {
        matches!(self, ContentKind::Short)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of an uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl PrivacyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyStatus::Public => "public",
            PrivacyStatus::Unlisted => "unlisted",
            PrivacyStatus::Private => "private",
        }
    }
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(PrivacyStatus::Public),
            "unlisted" => Ok(PrivacyStatus::Unlisted),
            "private" => Ok(PrivacyStatus::Private),
            other => Err(format!("unknown privacy status: {}", other)),
        }
    }
}

/// YouTube video category identifier (numeric string, e.g. "22").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self(DEFAULT_CATEGORY_ID.to_string())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pending upload sitting in one of the in-memory queues.
///
/// Jobs are created by an enqueue call and consumed by the next scheduled
/// trigger of the matching kind. They are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadJob {
    /// Unique job ID
    pub job_id: JobId,
    /// Which queue the job belongs to
    pub kind: ContentKind,
    /// Local path of the media file
    pub file_path: PathBuf,
    /// Video title
    pub title: String,
    /// Video description
    pub description: String,
    /// Keyword tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category
    #[serde(default)]
    pub category_id: CategoryId,
    /// Privacy status
    #[serde(default)]
    pub privacy_status: PrivacyStatus,
    /// When the job was enqueued
    pub enqueued_at: DateTime<Utc>,
}

impl UploadJob {
    /// Create a new job with default category and privacy.
    pub fn new(
        kind: ContentKind,
        file_path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            job_id: JobId::new(),
            kind,
            file_path: file_path.into(),
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
            category_id: CategoryId::default(),
            privacy_status: PrivacyStatus::default(),
            enqueued_at: Utc::now(),
        }
    }

    /// Set tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set category.
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set privacy status.
    pub fn with_privacy(mut self, privacy_status: PrivacyStatus) -> Self {
        self.privacy_status = privacy_status;
        self
    }

    /// Description as it should be sent to YouTube.
    ///
    /// Shorts get the `#Shorts` hashtag appended unless the title or the
    /// description already carries it. Regular videos are sent unchanged.
    pub fn upload_description(&self) -> Cow<'_, str> {
        if self.kind.is_short()
            && !self.title.contains(SHORTS_HASHTAG)
            && !self.description.contains(SHORTS_HASHTAG)
        {
            Cow::Owned(format!("{}\n\n{}", self.description, SHORTS_HASHTAG))
        } else {
            Cow::Borrowed(&self.description)
        }
    }
}
