//! OAuth 2.0 installed-app flow for the YouTube scopes.
//!
//! First run: a loopback listener on an ephemeral port receives the browser
//! redirect, the authorization code is exchanged (with PKCE) for tokens and
//! the result is written to the token file. Later runs reuse or refresh the
//! cached token.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AuthConfig;
use crate::error::{YoutubeError, YoutubeResult};
use crate::token_cache::{AccessToken, TokenCache, TokenProvider};
use crate::token_store::StoredToken;

/// Scopes requested by the agent: upload plus read-only access for charts and search.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube.upload",
    "https://www.googleapis.com/auth/youtube.readonly",
];

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

// =============================================================================
// Client secrets
// =============================================================================

/// OAuth client registration as downloaded from the Google console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The secrets file nests the registration under "installed" or "web".
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Parse a client secrets JSON document.
    pub fn from_json(json: &str) -> YoutubeResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(json)?;
        file.installed.or(file.web).ok_or_else(|| {
            YoutubeError::config_error("client secrets must contain an \"installed\" or \"web\" entry")
        })
    }

    /// Load a client secrets file.
    pub fn from_file(path: &Path) -> YoutubeResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            YoutubeError::config_error(format!(
                "Cannot read client secrets {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

// =============================================================================
// PKCE
// =============================================================================

/// PKCE verifier and its S256 challenge.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        Self::from_verifier(random_string(64))
    }

    pub fn from_verifier(verifier: String) -> Self {
        let digest = Sha256::digest(verifier.as_bytes());
        let challenge = URL_SAFE_NO_PAD.encode(digest);
        Self {
            verifier,
            challenge,
        }
    }
}

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

// =============================================================================
// Token endpoint
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    fn into_stored(self) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
            scopes: self
                .scope
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

/// Installed-app authorization against one client registration.
#[derive(Clone)]
pub struct InstalledAppFlow {
    secret: ClientSecret,
    scopes: Vec<String>,
    http: Client,
}

impl InstalledAppFlow {
    pub fn new(secret: ClientSecret, scopes: &[&str], http: Client) -> Self {
        Self {
            secret,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            http,
        }
    }

    /// URL the user opens to grant access.
    pub fn authorization_url(
        &self,
        redirect_uri: &str,
        state: &str,
        pkce: &PkcePair,
    ) -> YoutubeResult<Url> {
        let mut url = Url::parse(&self.secret.auth_uri)
            .map_err(|e| YoutubeError::config_error(format!("Invalid auth_uri: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.secret.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("state", state)
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");

        Ok(url)
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        pkce: &PkcePair,
    ) -> YoutubeResult<StoredToken> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("code_verifier", pkce.verifier.as_str()),
        ];
        let mut token = self.token_request(&form).await?;
        if token.scopes.is_empty() {
            token.scopes = self.scopes.clone();
        }
        Ok(token)
    }

    /// Mint a new access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> YoutubeResult<StoredToken> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
        ];
        self.token_request(&form).await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> YoutubeResult<StoredToken> {
        let response = self
            .http
            .post(&self.secret.token_uri)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(YoutubeError::auth_error(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into_stored())
    }

    /// Run the full browser authorization through a loopback redirect.
    pub async fn run_local_server(&self, timeout: Duration) -> YoutubeResult<StoredToken> {
        let receiver = LoopbackReceiver::bind().await?;
        let redirect_uri = receiver.redirect_uri().to_string();
        let state = random_string(32);
        let pkce = PkcePair::generate();

        let url = self.authorization_url(&redirect_uri, &state, &pkce)?;
        info!("Open this URL in your browser to authorize YouTube access:\n\n    {}\n", url);

        let code = receiver.wait_for_code(&state, timeout).await?;
        debug!("Received authorization code, exchanging for tokens");
        self.exchange_code(&code, &redirect_uri, &pkce).await
    }
}

// =============================================================================
// Loopback redirect receiver
// =============================================================================

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

type CallbackSender = Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>;

/// One-shot HTTP listener on 127.0.0.1 that captures the OAuth redirect.
pub struct LoopbackReceiver {
    listener: TcpListener,
    redirect_uri: String,
}

impl LoopbackReceiver {
    /// Bind an ephemeral port.
    pub async fn bind() -> YoutubeResult<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        Ok(Self {
            listener,
            redirect_uri: format!("http://127.0.0.1:{}/", port),
        })
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Serve until the first redirect arrives and return its code.
    pub async fn wait_for_code(self, expected_state: &str, timeout: Duration) -> YoutubeResult<String> {
        let (tx, rx) = oneshot::channel();
        let sender: CallbackSender = Arc::new(Mutex::new(Some(tx)));
        let app = Router::new().route("/", get(handle_callback)).with_state(sender);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.await.ok();
                })
                .await
        });

        let received = tokio::time::timeout(timeout, rx).await;
        let _ = shutdown_tx.send(());
        if tokio::time::timeout(Duration::from_secs(5), server).await.is_err() {
            warn!("Loopback listener did not shut down cleanly");
        }

        let params = match received {
            Ok(Ok(params)) => params,
            Ok(Err(_)) => return Err(YoutubeError::auth_error("Loopback listener closed early")),
            Err(_) => {
                return Err(YoutubeError::auth_error(format!(
                    "No authorization received within {}s",
                    timeout.as_secs()
                )))
            }
        };

        if let Some(error) = params.error {
            return Err(YoutubeError::auth_error(format!("Authorization denied: {}", error)));
        }
        if params.state.as_deref() != Some(expected_state) {
            return Err(YoutubeError::auth_error("OAuth state mismatch"));
        }
        params
            .code
            .ok_or_else(|| YoutubeError::auth_error("Redirect carried no authorization code"))
    }
}

async fn handle_callback(
    State(sender): State<CallbackSender>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    let tx = sender.lock().ok().and_then(|mut slot| slot.take());
    if let Some(tx) = tx {
        let _ = tx.send(params);
    }
    Html("<html><body><h3>Authorization complete.</h3><p>You can close this window.</p></body></html>")
}

// =============================================================================
// Token provider
// =============================================================================

/// Refreshes the stored token and keeps the token file up to date.
pub struct OAuthTokenProvider {
    flow: InstalledAppFlow,
    token_path: PathBuf,
    stored: tokio::sync::Mutex<StoredToken>,
}

impl OAuthTokenProvider {
    pub fn new(flow: InstalledAppFlow, token_path: PathBuf, stored: StoredToken) -> Self {
        Self {
            flow,
            token_path,
            stored: tokio::sync::Mutex::new(stored),
        }
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenProvider {
    async fn fetch_token(&self) -> YoutubeResult<AccessToken> {
        let mut stored = self.stored.lock().await;
        let refresh_token = stored.refresh_token.clone().ok_or_else(|| {
            YoutubeError::auth_error("Access token expired and no refresh token is cached")
        })?;

        let refreshed = self.flow.refresh(&refresh_token).await?;
        stored.apply_refresh(refreshed);

        if let Err(e) = stored.save(&self.token_path) {
            warn!("Failed to persist refreshed token: {}", e);
        }

        Ok(stored.to_access_token())
    }
}

/// Load, refresh or obtain credentials and return a cache ready for requests.
///
/// 1. A cached token that is still valid and covers the scopes is used as is.
/// 2. An expired one with a refresh token is refreshed.
/// 3. Otherwise the browser flow runs.
///
/// The token file is rewritten whenever a new token is obtained.
pub async fn authenticate(config: &AuthConfig, http: Client) -> YoutubeResult<Arc<TokenCache>> {
    let secret = ClientSecret::from_file(&config.client_secret_file)?;
    let flow = InstalledAppFlow::new(secret, SCOPES, http);
    let now = Utc::now();

    let cached = StoredToken::load(&config.token_file).filter(|t| t.covers_scopes(SCOPES));

    let token = match cached {
        Some(token) if token.is_valid_at(now) => {
            debug!("Using cached OAuth token from {}", config.token_file.display());
            token
        }
        Some(mut token) if token.refresh_token.is_some() => {
            let refresh_token = token.refresh_token.clone().unwrap_or_default();
            match flow.refresh(&refresh_token).await {
                Ok(refreshed) => {
                    info!("Refreshed cached OAuth token");
                    token.apply_refresh(refreshed);
                    token.save(&config.token_file)?;
                    token
                }
                Err(e) => {
                    warn!("Token refresh failed, starting authorization: {}", e);
                    authorize_and_save(&flow, config).await?
                }
            }
        }
        _ => authorize_and_save(&flow, config).await?,
    };

    let initial = token.to_access_token();
    let provider = OAuthTokenProvider::new(flow, config.token_file.clone(), token);
    Ok(Arc::new(TokenCache::with_token(Arc::new(provider), initial)))
}

async fn authorize_and_save(flow: &InstalledAppFlow, config: &AuthConfig) -> YoutubeResult<StoredToken> {
    let token = flow.run_local_server(config.authorization_timeout).await?;
    token.save(&config.token_file)?;
    info!("Authorization complete, token saved to {}", config.token_file.display());
    Ok(token)
}

// =============================================================================
// Tests
// =============================================================================
