//! Structured logging for upload jobs and subscriber setup for the binaries.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ytagent_models::UploadJob;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `ytagent=info` filter. `LOG_FORMAT=json`
/// switches to JSON lines, otherwise output is colored text.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ytagent=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Job logger for structured logging with consistent formatting.
///
/// Every line carries the job id, the content kind and the operation.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    kind: &'static str,
    operation: String,
}

impl JobLogger {
    pub fn new(job: &UploadJob, operation: &str) -> Self {
        Self {
            job_id: job.job_id.to_string(),
            kind: job.kind.as_str(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            kind = self.kind,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            kind = self.kind,
            operation = %self.operation,
            "Job progress: {}", message
        );
    }

    /// Log a problem that does not fail the job's operation.
    pub fn log_warning(&self, message: &str) {
        warn!(
            job_id = %self.job_id,
            kind = self.kind,
            operation = %self.operation,
            "Job warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            kind = self.kind,
            operation = %self.operation,
            "Job error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            kind = self.kind,
            operation = %self.operation,
            "Job completed: {}", message
        );
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span covering the whole upload of this job.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "upload_job",
            job_id = %self.job_id,
            kind = self.kind,
            operation = %self.operation
        )
    }
}
