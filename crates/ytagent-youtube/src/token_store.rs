//! On-disk OAuth token cache.
//!
//! The token file is plain JSON next to the client secrets. It is rewritten
//! after every authorization and refresh.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::YoutubeResult;
use crate::token_cache::AccessToken;

/// Tokens are treated as expired this long before their real expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

/// OAuth token as persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl StoredToken {
    /// Read the token file. A missing or unreadable file is `None`; the caller
    /// falls back to a fresh authorization.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!("No cached token at {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Ignoring malformed token file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write the token file, creating parent directories.
    pub fn save(&self, path: &Path) -> YoutubeResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!("Saved OAuth token to {}", path.display());
        Ok(())
    }

    /// True if the access token can still be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(exp) => now + Duration::seconds(EXPIRY_SKEW_SECS) < exp,
            None => false,
        }
    }

    /// True if every requested scope was granted.
    pub fn covers_scopes(&self, scopes: &[&str]) -> bool {
        scopes.iter().all(|s| self.scopes.iter().any(|g| g == s))
    }

    /// Merge a refresh response into this token. Google omits the refresh
    /// token on refresh, so the existing one is kept.
    pub fn apply_refresh(&mut self, refreshed: StoredToken) {
        self.access_token = refreshed.access_token;
        self.expires_at = refreshed.expires_at;
        if refreshed.refresh_token.is_some() {
            self.refresh_token = refreshed.refresh_token;
        }
        if !refreshed.scopes.is_empty() {
            self.scopes = refreshed.scopes;
        }
    }

    pub fn to_access_token(&self) -> AccessToken {
        AccessToken {
            token: self.access_token.clone(),
            expires_at: self.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in_secs: i64) -> StoredToken {
        StoredToken {
            access_token: "ya29.access".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            expires_at: Some(Utc::now() + Duration::seconds(expires_in_secs)),
            scopes: vec![
                "https://www.googleapis.com/auth/youtube.upload".to_string(),
                "https://www.googleapis.com/auth/youtube.readonly".to_string(),
            ],
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/token.json");
        let original = token(3600);

        original.save(&path).unwrap();
        assert_eq!(StoredToken::load(&path), Some(original));
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        assert_eq!(StoredToken::load(&path), None);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(StoredToken::load(&path), None);
    }

    #[test]
    fn test_validity_uses_skew() {
        let now = Utc::now();
        assert!(token(3600).is_valid_at(now));
        assert!(!token(30).is_valid_at(now));

        let mut no_expiry = token(3600);
        no_expiry.expires_at = None;
        assert!(!no_expiry.is_valid_at(now));
    }

    #[test]
    fn test_covers_scopes() {
        let t = token(3600);
        assert!(t.covers_scopes(&["https://www.googleapis.com/auth/youtube.upload"]));
        assert!(!t.covers_scopes(&["https://www.googleapis.com/auth/youtube"]));
    }

    #[test]
    fn test_apply_refresh_keeps_refresh_token() {
        let mut t = token(10);
        t.apply_refresh(StoredToken {
            access_token: "ya29.new".to_string(),
            refresh_token: None,
            expires_at: Some(Utc::now() + Duration::seconds(3599)),
            scopes: Vec::new(),
        });

        assert_eq!(t.access_token, "ya29.new");
        assert_eq!(t.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(t.scopes.len(), 2);
        assert!(t.is_valid_at(Utc::now()));
    }
}
