//! Upload metadata validation.
//!
//! Mirrors the limits YouTube enforces on `videos.insert` so a bad job is
//! rejected at enqueue time instead of when its trigger fires.

use thiserror::Error;

use crate::job::UploadJob;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Maximum description length in bytes.
pub const MAX_DESCRIPTION_BYTES: usize = 5000;

/// Maximum combined length of all tags in characters.
pub const MAX_TAGS_CHARS: usize = 500;

/// Errors that can occur when validating an upload job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobValidationError {
    #[error("Title is empty")]
    EmptyTitle,

    #[error("Title is {0} characters, limit is {max}", max = MAX_TITLE_CHARS)]
    TitleTooLong(usize),

    #[error("Description is {0} bytes, limit is {max}", max = MAX_DESCRIPTION_BYTES)]
    DescriptionTooLong(usize),

    #[error("Tags total {0} characters, limit is {max}", max = MAX_TAGS_CHARS)]
    TagsTooLong(usize),

    #[error("{field} contains '<' or '>'")]
    AngleBrackets { field: &'static str },

    #[error("File path is empty")]
    EmptyPath,
}

/// Validate title, description, tags and path of a job.
pub fn validate_job(job: &UploadJob) -> Result<(), JobValidationError> {
    if job.file_path.as_os_str().is_empty() {
        return Err(JobValidationError::EmptyPath);
    }

    let title = job.title.trim();
    if title.is_empty() {
        return Err(JobValidationError::EmptyTitle);
    }

    let title_chars = job.title.chars().count();
    if title_chars > MAX_TITLE_CHARS {
        return Err(JobValidationError::TitleTooLong(title_chars));
    }

    if has_angle_brackets(&job.title) {
        return Err(JobValidationError::AngleBrackets { field: "Title" });
    }

    // Checked against what is actually sent, including a Shorts hashtag.
    let description = job.upload_description();
    if description.len() > MAX_DESCRIPTION_BYTES {
        return Err(JobValidationError::DescriptionTooLong(description.len()));
    }

    if has_angle_brackets(&description) {
        return Err(JobValidationError::AngleBrackets {
            field: "Description",
        });
    }

    let tags_chars: usize = job.tags.iter().map(|t| t.chars().count()).sum();
    if tags_chars > MAX_TAGS_CHARS {
        return Err(JobValidationError::TagsTooLong(tags_chars));
    }

    Ok(())
}

fn has_angle_brackets(s: &str) -> bool {
    s.contains('<') || s.contains('>')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ContentKind;

    fn job(title: &str, description: &str) -> UploadJob {
        UploadJob::new(ContentKind::Video, "videos/a.mp4", title, description)
    }

    #[test]
    fn test_valid_job() {
        assert_eq!(validate_job(&job("Amazing Content", "Check it out")), Ok(()));
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(
            validate_job(&job("   ", "desc")),
            Err(JobValidationError::EmptyTitle)
        );
    }

    #[test]
    fn test_title_limit_counts_chars() {
        let title = "é".repeat(MAX_TITLE_CHARS);
        assert_eq!(validate_job(&job(&title, "")), Ok(()));

        let title = "a".repeat(MAX_TITLE_CHARS + 1);
        assert_eq!(
            validate_job(&job(&title, "")),
            Err(JobValidationError::TitleTooLong(101))
        );
    }

    #[test]
    fn test_limit_messages_name_the_limit() {
        assert_eq!(
            JobValidationError::TitleTooLong(120).to_string(),
            "Title is 120 characters, limit is 100"
        );
        assert_eq!(
            JobValidationError::DescriptionTooLong(6000).to_string(),
            "Description is 6000 bytes, limit is 5000"
        );
        assert_eq!(
            JobValidationError::TagsTooLong(501).to_string(),
            "Tags total 501 characters, limit is 500"
        );
    }

    #[test]
    fn test_angle_brackets_rejected() {
        assert!(matches!(
            validate_job(&job("<b>bold</b>", "")),
            Err(JobValidationError::AngleBrackets { field: "Title" })
        ));
    }

    #[test]
    fn test_short_hashtag_counts_toward_description_limit() {
        let description = "a".repeat(MAX_DESCRIPTION_BYTES - 2);
        let short = UploadJob::new(ContentKind::Short, "s.mp4", "Tip", description);
        assert!(matches!(
            validate_job(&short),
            Err(JobValidationError::DescriptionTooLong(_))
        ));
    }

    #[test]
    fn test_tags_limit() {
        let tags = vec!["x".repeat(300), "y".repeat(201)];
        let j = job("T", "D").with_tags(tags);
        assert_eq!(validate_job(&j), Err(JobValidationError::TagsTooLong(501)));
    }

    #[test]
    fn test_empty_path() {
        let j = UploadJob::new(ContentKind::Video, "", "T", "D");
        assert_eq!(validate_job(&j), Err(JobValidationError::EmptyPath));
    }
}
