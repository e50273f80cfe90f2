//! Configuration module for ripplemap
//!
//! Configuration is a TOML file with two sections: `[api]` (remote endpoint
//! base URL, page size, throttle delays, timeout) and `[graph]` (graph
//! database connection). Loading validates the configuration and can hash
//! the file content for run identification.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{ApiConfig, Config, GraphConfig};
pub use validation::validate;
