//! YouTube API error types.

use serde::Deserialize;
use thiserror::Error;

/// Result type for YouTube operations.
pub type YoutubeResult<T> = Result<T, YoutubeError>;

/// Errors that can occur while talking to YouTube.
#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Media file not found: {0}")]
    MissingFile(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Google API error envelope: `{"error": {"code", "message", "errors": [{"reason"}]}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded", "uploadLimitExceeded"];

impl YoutubeError {
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Map an HTTP error status and response body to an error.
    ///
    /// The body is parsed as a Google error envelope when possible so the
    /// message and quota reasons surface instead of raw JSON.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let (message, reasons) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (
                envelope.error.message,
                envelope
                    .error
                    .errors
                    .into_iter()
                    .map(|e| e.reason)
                    .collect::<Vec<_>>(),
            ),
            Err(_) => (body, Vec::new()),
        };

        match status {
            401 => Self::AuthError(message),
            403 if reasons.iter().any(|r| QUOTA_REASONS.contains(&r.as_str())) => {
                Self::QuotaExceeded(message)
            }
            403 => Self::PermissionDenied(message),
            404 => Self::NotFound(message),
            429 => Self::RateLimited(message),
            500..=599 => Self::ServerError(status, message),
            _ => Self::RequestFailed(format!("HTTP {}: {}", status, message)),
        }
    }

    /// HTTP status this error corresponds to, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            YoutubeError::AuthError(_) => Some(401),
            YoutubeError::PermissionDenied(_) | YoutubeError::QuotaExceeded(_) => Some(403),
            YoutubeError::NotFound(_) => Some(404),
            YoutubeError::RateLimited(_) => Some(429),
            YoutubeError::ServerError(code, _) => Some(*code),
            YoutubeError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error is retryable.
    ///
    /// Only transient transport and server failures qualify. Rate limiting
    /// and quota errors are surfaced to the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            YoutubeError::ServerError(_, _) => true,
            YoutubeError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}
