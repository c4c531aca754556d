//! YouTube Data API v3 client.
//!
//! This crate provides:
//! - Resumable video uploads (`videos.insert`)
//! - Trending chart and search queries, plus the trend analyzer built on them
//! - OAuth installed-app flow with a cached, refreshable token
//! - API key authentication for read-only calls
//! - Retry on transient failures and request metrics

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod oauth;
pub mod retry;
pub mod token_cache;
pub mod token_store;
pub mod trends;
pub mod types;

pub use client::{build_http_client, Credentials, YoutubeClient};
pub use config::{AuthConfig, YoutubeConfig};
pub use error::{YoutubeError, YoutubeResult};
pub use oauth::{authenticate, ClientSecret, InstalledAppFlow, OAuthTokenProvider, SCOPES};
pub use retry::RetryConfig;
pub use token_cache::{AccessToken, TokenCache, TokenProvider};
pub use token_store::StoredToken;
pub use trends::TrendAnalyzer;
pub use types::{SearchOrder, SearchParams};
