//! Build upload jobs from the media files in a folder.

use std::path::Path;

use tracing::{debug, warn};
use ytagent_models::{CategoryId, ContentKind, PrivacyStatus, UploadJob};

use crate::error::QueueResult;

/// File extensions treated as uploadable video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "webm", "wmv", "flv", "mpg", "mpeg", "3gp",
];

/// Metadata applied to every job built from a folder.
#[derive(Debug, Clone, Default)]
pub struct JobDefaults {
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: CategoryId,
    pub privacy_status: PrivacyStatus,
}

/// List the video files directly inside `folder`, sorted by file name, and
/// build one job per file.
///
/// The title is the file stem with `_` and `-` turned into spaces. A folder
/// that does not exist yields no jobs.
pub fn scan_folder(
    folder: &Path,
    kind: ContentKind,
    defaults: &JobDefaults,
) -> QueueResult<Vec<UploadJob>> {
    if !folder.is_dir() {
        debug!("Media folder {} not found, nothing to seed", folder.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_video_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut jobs = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(title) = title_from_path(&path) else {
            warn!("Skipping file without a usable name: {}", path.display());
            continue;
        };

        let job = UploadJob::new(kind, path, title, defaults.description.clone())
            .with_tags(defaults.tags.iter().cloned())
            .with_category(defaults.category_id.clone())
            .with_privacy(defaults.privacy_status);
        jobs.push(job);
    }

    Ok(jobs)
}

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn title_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let title = stem
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (!title.is_empty()).then_some(title)
}
