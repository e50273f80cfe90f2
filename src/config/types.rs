use serde::Deserialize;

/// Main configuration structure for ripplemap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub graph: GraphConfig,
}

/// Remote API access configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the platform's public API surface
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User agent presented on every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Items requested per page of a paged endpoint
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Delay between successive page fetches (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Delay after each repost detail fetch within a page (milliseconds)
    #[serde(rename = "item-delay-ms")]
    pub item_delay_ms: u64,

    /// Delay between a post detail fetch and the follow-up author profile
    /// fetch (milliseconds)
    #[serde(rename = "detail-delay-ms")]
    pub detail_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

/// Graph database connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Bolt URI of the graph database
    pub uri: String,

    /// Database user
    pub user: String,

    /// Database password; may be left empty and supplied via the
    /// GRAPH_PASSWORD environment variable instead
    #[serde(default)]
    pub password: String,
}
