use crate::config::types::{ApiConfig, Config, GraphConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_graph_config(&config.graph)?;
    Ok(())
}

/// Validates API access configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "https" && base.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 || config.page_size > 50 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 50, got {}",
            config.page_size
        )));
    }

    // Delays below 100ms defeat the throttle contract with the remote
    // service and risk the crawl being blocked.
    for (name, value) in [
        ("page-delay-ms", config.page_delay_ms),
        ("item-delay-ms", config.item_delay_ms),
        ("detail-delay-ms", config.detail_delay_ms),
    ] {
        if value < 100 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 100ms, got {}ms",
                name, value
            )));
        }
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates graph database configuration
fn validate_graph_config(config: &GraphConfig) -> Result<(), ConfigError> {
    const SCHEMES: [&str; 4] = ["bolt://", "bolt+s://", "neo4j://", "neo4j+s://"];

    if !SCHEMES.iter().any(|s| config.uri.starts_with(s)) {
        return Err(ConfigError::Validation(format!(
            "graph uri must use a bolt:// or neo4j:// scheme, got '{}'",
            config.uri
        )));
    }

    if config.user.is_empty() {
        return Err(ConfigError::Validation(
            "graph user cannot be empty".to_string(),
        ));
    }

    Ok(())
}
