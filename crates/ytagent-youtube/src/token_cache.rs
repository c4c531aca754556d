//! Access token caching for OAuth-authenticated calls.
//!
//! - Refresh margin to avoid token expiry during requests
//! - Single-flight refresh behind a write lock
//! - Fallback to the existing token while it is still usable

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{YoutubeError, YoutubeResult};

/// Refresh 60 seconds before expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// TTL assumed when the provider does not report an expiry (50 minutes).
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50 * 60);

/// A bearer token and its expiry as reported by the issuer.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Source of fresh access tokens.
///
/// Each call must return a newly minted token; the cache decides when to ask.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> YoutubeResult<AccessToken>;
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn from_access_token(token: AccessToken) -> Self {
        let expires_at = match token.expires_at {
            Some(exp) => {
                let now = Utc::now();
                if exp > now {
                    match (exp - now).to_std() {
                        Ok(ttl) => Instant::now() + ttl,
                        Err(_) => Instant::now() + TOKEN_DEFAULT_TTL,
                    }
                } else {
                    // Already expired: force a refresh on next use.
                    Instant::now()
                }
            }
            None => Instant::now() + TOKEN_DEFAULT_TTL,
        };

        Self {
            access_token: token.token,
            expires_at,
        }
    }

    /// Valid including the refresh margin.
    fn is_valid(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    /// Still accepted by the server, even if a refresh is due.
    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Thread-safe token cache with single-flight refresh.
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    cache: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache").finish_non_exhaustive()
    }
}

impl TokenCache {
    /// Create an empty cache; the first request fetches a token.
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(None),
        }
    }

    /// Create a cache seeded with a token obtained elsewhere (e.g. from disk).
    pub fn with_token(provider: Arc<dyn TokenProvider>, token: AccessToken) -> Self {
        Self {
            provider,
            cache: RwLock::new(Some(CachedToken::from_access_token(token))),
        }
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_token(&self) -> YoutubeResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if cached.is_valid() {
                return Ok(cached.access_token.clone());
            }
        }

        self.refresh_token(&mut cache).await
    }

    async fn refresh_token(&self, cache: &mut Option<CachedToken>) -> YoutubeResult<String> {
        match self.provider.fetch_token().await {
            Ok(token) => {
                let cached = CachedToken::from_access_token(token);
                let access_token = cached.access_token.clone();
                *cache = Some(cached);

                debug!("Refreshed YouTube access token");
                Ok(access_token)
            }
            Err(e) => {
                if let Some(cached) = cache.as_ref() {
                    if cached.is_usable() {
                        warn!("Token refresh failed, using existing token: {}", e);
                        return Ok(cached.access_token.clone());
                    }
                }

                Err(YoutubeError::auth_error(format!(
                    "Failed to obtain access token: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingProvider {
        calls: AtomicU32,
        ttl_secs: i64,
        fail: bool,
    }

    #[async_trait]
    impl TokenProvider for CountingProvider {
        async fn fetch_token(&self) -> YoutubeResult<AccessToken> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(YoutubeError::auth_error("refresh rejected"));
            }
            Ok(AccessToken {
                token: format!("token-{}", n),
                expires_at: Some(Utc::now() + chrono::Duration::seconds(self.ttl_secs)),
            })
        }
    }

    fn provider(ttl_secs: i64, fail: bool) -> Arc<CountingProvider> {
        Arc::new(CountingProvider {
            calls: AtomicU32::new(0),
            ttl_secs,
            fail,
        })
    }

    #[test]
    fn test_token_refresh_margin() {
        assert_eq!(TOKEN_REFRESH_MARGIN, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_caches_valid_token() {
        let p = provider(3600, false);
        let cache = TokenCache::new(p.clone());

        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        assert_eq!(p.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refreshes_inside_margin() {
        // Expires in 30s, inside the 60s margin: every call refreshes.
        let p = provider(30, false);
        let cache = TokenCache::new(p.clone());

        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let p = provider(3600, false);
        let cache = TokenCache::new(p.clone());

        cache.get_token().await.unwrap();
        cache.invalidate().await;
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_seeded_token_used_without_fetch() {
        let p = provider(3600, false);
        let seed = AccessToken {
            token: "from-disk".to_string(),
            expires_at: Some(Utc::now() + chrono::Duration::minutes(30)),
        };
        let cache = TokenCache::with_token(p.clone(), seed);

        assert_eq!(cache.get_token().await.unwrap(), "from-disk");
        assert_eq!(p.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_usable_token() {
        let p = provider(3600, true);
        let seed = AccessToken {
            token: "almost-expired".to_string(),
            expires_at: Some(Utc::now() + chrono::Duration::seconds(30)),
        };
        let cache = TokenCache::with_token(p, seed);

        assert_eq!(cache.get_token().await.unwrap(), "almost-expired");
    }

    #[tokio::test]
    async fn test_debug_does_not_show_token() {
        let cache = TokenCache::new(provider(3600, false));
        cache.get_token().await.unwrap();

        assert_eq!(format!("{:?}", cache), "TokenCache { .. }");
    }

    #[tokio::test]
    async fn test_failed_refresh_without_token_errors() {
        let cache = TokenCache::new(provider(3600, true));
        assert!(matches!(
            cache.get_token().await,
            Err(YoutubeError::AuthError(_))
        ));
    }
}
