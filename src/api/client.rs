//! HTTP client for the platform's public JSON endpoints
//!
//! This module handles all remote reads for the crawler, including:
//! - Building a reqwest client with explicit timeouts and user agent
//! - The single-item shapes (post detail, user profile)
//! - The paged shapes (reposts, likes, comments)
//! - Error classification (timeout vs transport vs status vs payload)

use crate::api::{ApiError, ApiResult, PageBatch};
use crate::config::ApiConfig;
use crate::model::SchemaError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Client for the remote post/repost/comment/like surface
///
/// All methods are plain GETs returning parsed JSON. Pagination cursors are
/// passed in by the caller; the client knows endpoint shapes, not traversal.
pub struct ApiClient {
    http: Client,
    base: Url,
    page_size: u32,
}

impl ApiClient {
    /// Builds a client from the API configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The `[api]` section of the loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ApiClient)` - Successfully built client
    /// * `Err(ApiError)` - Invalid base URL or client construction failure
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base = Url::parse(&config.base_url).map_err(|_| ApiError::Endpoint {
            url: config.base_url.clone(),
        })?;

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base,
            page_size: config.page_size,
        })
    }

    /// Fetches the full detail record for one post
    ///
    /// The returned value is the raw post record; the authoring user's id is
    /// nested under `user.id`.
    pub async fn post_detail(&self, id: &str) -> ApiResult<Value> {
        let url = self.endpoint(
            "/ajax/statuses/show",
            &[("id", id), ("isGetLongText", "true")],
        )?;
        self.get_json(url).await
    }

    /// Fetches the full profile record for one user
    pub async fn user_profile(&self, uid: &str) -> ApiResult<Value> {
        let url = self.endpoint("/ajax/profile/info", &[("uid", uid)])?;
        let body = self.get_json(url.clone()).await?;

        // The profile payload nests the user record under data.user
        body.pointer("/data/user")
            .cloned()
            .ok_or_else(|| ApiError::Shape {
                url: url.to_string(),
                source: SchemaError::MissingField {
                    record: "profile",
                    field: "data.user",
                },
            })
    }

    /// Fetches one page of the repost timeline for a post
    pub async fn repost_page(&self, id: &str, page: u64) -> ApiResult<PageBatch> {
        let page = page.to_string();
        let count = self.page_size.to_string();
        let url = self.endpoint(
            "/ajax/statuses/repostTimeline",
            &[
                ("id", id),
                ("page", &page),
                ("moduleID", "feed"),
                ("count", &count),
            ],
        )?;
        self.get_batch(url, false).await
    }

    /// Fetches one page of the likers of a post
    pub async fn like_page(&self, id: &str, page: u64) -> ApiResult<PageBatch> {
        let page = page.to_string();
        let count = self.page_size.to_string();
        let url = self.endpoint(
            "/ajax/statuses/likeShow",
            &[
                ("id", id),
                ("attitude_type", "0"),
                ("attitude_enable", "1"),
                ("page", &page),
                ("count", &count),
            ],
        )?;
        self.get_batch(url, false).await
    }

    /// Fetches one batch of comments on a post
    ///
    /// `max_id` is the server-supplied continuation token from the previous
    /// batch; an empty token requests the first batch.
    pub async fn comment_page(&self, id: &str, max_id: &str) -> ApiResult<PageBatch> {
        let count = self.page_size.to_string();
        let url = self.endpoint(
            "/ajax/statuses/buildComments",
            &[
                ("is_reload", "1"),
                ("id", id),
                ("is_show_bulletin", "2"),
                ("is_mix", "0"),
                ("count", &count),
                ("fetch_level", "0"),
                ("max_id", max_id),
            ],
        )?;
        self.get_batch(url, true).await
    }

    /// Builds an endpoint URL from the configured base
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
        let mut url = self.base.join(path).map_err(|_| ApiError::Endpoint {
            url: self.base.to_string(),
        })?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Performs a GET and parses the response body as JSON
    async fn get_json(&self, url: Url) -> ApiResult<Value> {
        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ApiError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| ApiError::Json {
            url: url.to_string(),
            source: e,
        })
    }

    /// Performs a GET and parses the response as a paged batch
    async fn get_batch(&self, url: Url, with_token: bool) -> ApiResult<PageBatch> {
        let body = self.get_json(url.clone()).await?;
        PageBatch::parse(body, with_token).map_err(|source| ApiError::Shape {
            url: url.to_string(),
            source,
        })
    }
}
