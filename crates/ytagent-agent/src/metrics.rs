//! Upload metrics.

use metrics::counter;
use ytagent_models::ContentKind;

pub mod names {
    pub const UPLOADS_TOTAL: &str = "ytagent_uploads_total";
}

/// Result of a scheduled upload slot, as recorded in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadResultLabel {
    Uploaded,
    QueueEmpty,
    Failed,
}

impl UploadResultLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::QueueEmpty => "queue_empty",
            Self::Failed => "failed",
        }
    }
}

pub fn record_upload(kind: ContentKind, outcome: UploadResultLabel) {
    counter!(
        names::UPLOADS_TOTAL,
        "kind" => kind.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
