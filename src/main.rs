//! Ripplemap main entry point
//!
//! This is the command-line interface for the ripplemap crawler.

use anyhow::Context;
use clap::Parser;
use ripplemap::config::load_config_with_hash;
use ripplemap::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripplemap: a repost-cascade graph crawler
///
/// Ripplemap starts from one or more seed post identifiers, drains each
/// post's reposts, likes and comments breadth-first, and materializes the
/// discovered users, posts, comments and relationships into a graph
/// database.
#[derive(Parser, Debug)]
#[command(name = "ripplemap")]
#[command(version = "1.0.0")]
#[command(about = "A repost-cascade graph crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Seed post identifier to start from (repeatable)
    #[arg(short, long = "entry", value_name = "POST_ID", required = true, num_args = 1..)]
    entry: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Graph credentials may live in the environment rather than the file
    if config.graph.password.is_empty() {
        if let Ok(password) = std::env::var("GRAPH_PASSWORD") {
            config.graph.password = password;
        }
    }

    if cli.dry_run {
        handle_dry_run(&config, &cli.entry);
        return Ok(());
    }

    tracing::info!("Seed post identifiers: {:?}", cli.entry);

    let stats = crawl(config, cli.entry).await?;

    tracing::info!(
        "Done: {} posts expanded ({} failed), {} reposts, {} likes, {} comments",
        stats.posts_expanded,
        stats.posts_failed,
        stats.reposts,
        stats.likes,
        stats.comments
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripplemap=info,warn"),
            1 => EnvFilter::new("ripplemap=debug,info"),
            2 => EnvFilter::new("ripplemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &ripplemap::Config, seeds: &[String]) {
    println!("=== Ripplemap Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Page size: {}", config.api.page_size);
    println!("  Page delay: {}ms", config.api.page_delay_ms);
    println!("  Item delay: {}ms", config.api.item_delay_ms);
    println!("  Detail delay: {}ms", config.api.detail_delay_ms);
    println!("  Request timeout: {}s", config.api.request_timeout_secs);

    println!("\nGraph:");
    println!("  URI: {}", config.graph.uri);
    println!("  User: {}", config.graph.user);

    println!("\nSeed post identifiers ({}):", seeds.len());
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {} seed post(s)", seeds.len());
}
