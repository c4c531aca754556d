//! YouTube Data API client.
//!
//! - HTTP client tuning (pooling, timeouts)
//! - API key or OAuth bearer authentication
//! - Token refresh on 401 for OAuth calls
//! - Retry with backoff for read-only calls
//! - Observability (tracing spans, metrics)

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{Stream, StreamExt};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{Body, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, info_span, Instrument};
use ytagent_models::{UploadJob, UploadedVideo};

use crate::config::YoutubeConfig;
use crate::error::{YoutubeError, YoutubeResult};
use crate::metrics::record_request;
use crate::retry::with_retry;
use crate::token_cache::TokenCache;
use crate::types::{
    clamp_max_results, InsertedVideo, SearchListResponse, SearchParams, SearchResult,
    VideoInsertBody, VideoListResponse, VideoResource,
};

/// Media type announced for uploads; YouTube sniffs the real container.
const UPLOAD_CONTENT_TYPE: &str = "video/*";

/// How a request proves its identity.
#[derive(Clone)]
pub enum Credentials {
    /// Developer key, read-only public data
    ApiKey(String),
    /// User-delegated OAuth token, required for uploads
    OAuth(Arc<TokenCache>),
}

/// YouTube Data API client.
#[derive(Clone)]
pub struct YoutubeClient {
    http: Client,
    config: YoutubeConfig,
    credentials: Credentials,
}

/// Build the shared HTTP client.
pub fn build_http_client(config: &YoutubeConfig) -> YoutubeResult<Client> {
    Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .user_agent(concat!("ytagent/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(YoutubeError::Network)
}

impl YoutubeClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: YoutubeConfig, credentials: Credentials) -> YoutubeResult<Self> {
        let http = build_http_client(&config)?;
        Ok(Self::with_http(http, config, credentials))
    }

    /// Create a client on an existing HTTP client.
    pub fn with_http(http: Client, config: YoutubeConfig, credentials: Credentials) -> Self {
        Self {
            http,
            config,
            credentials,
        }
    }

    /// Read-only client authenticated with an API key.
    pub fn with_api_key(config: YoutubeConfig, api_key: impl Into<String>) -> YoutubeResult<Self> {
        Self::new(config, Credentials::ApiKey(api_key.into()))
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Upload a queued job through a resumable session.
    ///
    /// The session is opened with the metadata, then the whole file is sent in
    /// one streamed PUT. Uploads are not retried.
    pub async fn insert_video(&self, job: &UploadJob) -> YoutubeResult<UploadedVideo> {
        if matches!(self.credentials, Credentials::ApiKey(_)) {
            return Err(YoutubeError::auth_error(
                "Uploads require OAuth credentials, not an API key",
            ));
        }

        let metadata = tokio::fs::metadata(&job.file_path)
            .await
            .map_err(|_| YoutubeError::MissingFile(job.file_path.display().to_string()))?;
        if !metadata.is_file() {
            return Err(YoutubeError::MissingFile(job.file_path.display().to_string()));
        }
        let total_bytes = metadata.len();

        let body = VideoInsertBody::from_job(job);
        let url = format!("{}/videos", self.config.upload_base_url);
        let job_id = job.job_id.to_string();

        self.execute_request("videos.insert", async {
            let response = self
                .send(|| {
                    self.http
                        .post(&url)
                        .query(&[("uploadType", "resumable"), ("part", VideoInsertBody::parts())])
                        .header("X-Upload-Content-Type", UPLOAD_CONTENT_TYPE)
                        .header("X-Upload-Content-Length", total_bytes)
                        .json(&body)
                })
                .await?;

            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let session_uri = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    YoutubeError::invalid_response("Upload session response had no Location header")
                })?;

            debug!(job_id = %job_id, bytes = total_bytes, "Upload session opened");

            let file = tokio::fs::File::open(&job.file_path).await?;
            let stream = with_progress(ReaderStream::new(file), total_bytes, job_id.clone());

            let response = self
                .http
                .put(&session_uri)
                .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
                .header(CONTENT_LENGTH, total_bytes)
                .timeout(self.config.upload_timeout)
                .body(Body::wrap_stream(stream))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let inserted: InsertedVideo = response.json().await?;
            info!(job_id = %job_id, video_id = %inserted.id, "Video uploaded! ID: {}", inserted.id);

            Ok(UploadedVideo {
                video_id: inserted.id,
            })
        })
        .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Most popular videos for a region (`videos.list chart=mostPopular`).
    ///
    /// `category_id` "0" or `None` covers all categories.
    pub async fn list_most_popular(
        &self,
        region_code: &str,
        max_results: u32,
        category_id: Option<&str>,
    ) -> YoutubeResult<Vec<VideoResource>> {
        let mut query = vec![
            ("part", "snippet,statistics".to_string()),
            ("chart", "mostPopular".to_string()),
            ("regionCode", region_code.to_string()),
            ("maxResults", clamp_max_results(max_results).to_string()),
        ];
        if let Some(category) = category_id {
            query.push(("videoCategoryId", category.to_string()));
        }

        let response: VideoListResponse = self.get_json("videos.list", "videos", &query).await?;
        Ok(response.items)
    }

    /// Video search (`search.list type=video`).
    pub async fn search(&self, params: &SearchParams) -> YoutubeResult<Vec<SearchResult>> {
        let query = params.to_query();
        let response: SearchListResponse = self.get_json("search.list", "search", &query).await?;
        Ok(response.items)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> YoutubeResult<T> {
        let url = format!("{}/{}", self.config.api_base_url, path);
        let url = url.as_str();

        self.execute_request(
            operation,
            with_retry(&self.config.retry, operation, move || async move {
                let response = self.send(|| self.http.get(url).query(query)).await?;
                if !response.status().is_success() {
                    return Err(Self::error_from_response(response).await);
                }
                Ok(response.json::<T>().await?)
            }),
        )
        .await
    }

    async fn authorize(&self, request: RequestBuilder) -> YoutubeResult<RequestBuilder> {
        match &self.credentials {
            Credentials::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            Credentials::OAuth(cache) => {
                let token = cache.get_token().await?;
                Ok(request.bearer_auth(token))
            }
        }
    }

    /// Send an authorized request. With OAuth, a 401 drops the cached token
    /// and the request is sent once more with a fresh one.
    async fn send<F>(&self, build: F) -> YoutubeResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let response = self.authorize(build()).await?.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Credentials::OAuth(cache) = &self.credentials {
                debug!("Access token rejected, refreshing and retrying once");
                cache.invalidate().await;
                return Ok(self.authorize(build()).await?.send().await?);
            }
        }

        Ok(response)
    }

    async fn execute_request<T, F>(&self, operation: &str, fut: F) -> YoutubeResult<T>
    where
        F: std::future::Future<Output = YoutubeResult<T>>,
    {
        let span = info_span!("youtube_request", operation = %operation);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(0),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn error_from_response(response: Response) -> YoutubeError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        YoutubeError::from_http_status(status, body)
    }
}

/// Log upload progress in 10% steps as chunks are pulled by the HTTP client.
fn with_progress<S, B>(stream: S, total: u64, job_id: String) -> impl Stream<Item = std::io::Result<B>>
where
    S: Stream<Item = std::io::Result<B>>,
    B: AsRef<[u8]>,
{
    let mut sent: u64 = 0;
    let mut next_report: u64 = 10;

    stream.inspect(move |chunk| {
        if let Ok(bytes) = chunk {
            sent += bytes.as_ref().len() as u64;
            let percent = if total == 0 { 100 } else { sent * 100 / total };
            if percent >= next_report {
                info!(job_id = %job_id, "Upload {}% complete", percent);
                next_report = (percent / 10 + 1) * 10;
            }
        }
    })
}
