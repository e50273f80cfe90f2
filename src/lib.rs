//! Ripplemap: a repost-cascade graph crawler
//!
//! This crate crawls a social platform's public post surface breadth-first
//! from one or more seed post identifiers, draining the reposts, likes and
//! comments of every discovered post and materializing users, posts,
//! comments and their relationships into a graph database.

pub mod api;
pub mod config;
pub mod crawler;
pub mod graph;
pub mod model;

use thiserror::Error;

/// Main error type for ripplemap operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] api::ApiError),

    #[error("Malformed record: {0}")]
    Schema(#[from] model::SchemaError),

    #[error("Graph store error: {0}")]
    Graph(#[from] graph::GraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for ripplemap operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlStats, Engine};
pub use model::{Comment, Post, User};
