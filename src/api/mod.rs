//! Remote API access
//!
//! This module contains the read-only client for the platform's public JSON
//! surface and the exhaustive pager that drains its paged endpoints:
//! - Endpoint shapes for post detail, user profile, reposts, likes, comments
//! - Error classification (transport, status, malformed payload)
//! - Pagination with both cursor styles and a fixed inter-page throttle

mod client;
mod pager;

pub use client::ApiClient;
pub use pager::{drain_by_page, drain_by_token, PageBatch};

use crate::model::SchemaError;
use thiserror::Error;

/// Errors that can occur talking to the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid endpoint URL from base '{url}'")]
    Endpoint { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON from {url}: {source}")]
    Json { url: String, source: reqwest::Error },

    #[error("Malformed response from {url}: {source}")]
    Shape { url: String, source: SchemaError },
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
