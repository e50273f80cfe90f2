//! Crawler module for frontier traversal and materialization
//!
//! This module contains the core crawling logic, including:
//! - The FIFO frontier queue with enqueue-time deduplication
//! - Per-run memoization of user profile lookups
//! - The breadth-first traversal engine
//! - Overall crawl entry point wiring configuration to the graph database

mod engine;
mod frontier;
mod user_cache;

pub use engine::{CrawlStats, Engine};
pub use frontier::Frontier;
pub use user_cache::UserCache;

use crate::config::Config;
use crate::graph::Neo4jGraph;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Connect to the configured graph database
/// 2. Ensure identifier uniqueness constraints exist
/// 3. Traverse breadth-first from the seed post identifiers
/// 4. Report the accumulated crawl statistics
///
/// # Arguments
///
/// * `config` - The loaded configuration
/// * `seeds` - Seed post identifiers to start from
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed; per-item failures are counted, not fatal
/// * `Err(RippleError)` - Setup or connection failure
pub async fn crawl(config: Config, seeds: Vec<String>) -> Result<CrawlStats> {
    let graph = Neo4jGraph::connect(&config.graph).await?;
    graph.ensure_constraints().await?;

    let mut engine = Engine::new(&config, graph)?;
    engine.run(seeds).await
}
