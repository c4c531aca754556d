//! Client and authentication configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryConfig;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/youtube/v3";

/// YouTube client configuration.
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    /// Base URL of the Data API
    pub api_base_url: String,
    /// Base URL of the media upload endpoint
    pub upload_base_url: String,
    /// Request timeout for metadata calls
    pub timeout: Duration,
    /// Request timeout for the media transfer of an upload
    pub upload_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration for read-only calls
    pub retry: RetryConfig,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(3600),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

impl YoutubeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            upload_base_url: std::env::var("YOUTUBE_UPLOAD_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("YOUTUBE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            upload_timeout: Duration::from_secs(
                std::env::var("YOUTUBE_UPLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            connect_timeout: Duration::from_secs(
                std::env::var("YOUTUBE_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            retry: RetryConfig::from_env(),
        }
    }

    /// Point both API and upload endpoints at one base URL (used against mock servers).
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.api_base_url = format!("{}/youtube/v3", base);
        self.upload_base_url = format!("{}/upload/youtube/v3", base);
        self
    }
}

/// Where OAuth credentials live on disk.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth client secrets downloaded from the Google console
    pub client_secret_file: PathBuf,
    /// Cached token written after a successful authorization
    pub token_file: PathBuf,
    /// How long to wait for the browser redirect during first authorization
    pub authorization_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_secret_file: PathBuf::from("client_secret.json"),
            token_file: PathBuf::from("token.json"),
            authorization_timeout: Duration::from_secs(300),
        }
    }
}

impl AuthConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            client_secret_file: std::env::var("YOUTUBE_CLIENT_SECRET_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("client_secret.json")),
            token_file: std::env::var("YOUTUBE_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("token.json")),
            authorization_timeout: Duration::from_secs(
                std::env::var("YOUTUBE_AUTH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}
