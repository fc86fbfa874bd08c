//! Prowl main entry point

use anyhow::bail;
use clap::Parser;
use prowl::config::{load_config, validate, Config};
use prowl::crawler::{crawl, run_crawl};
use prowl::seeds::StaticSeeds;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Prowl: a priority-driven web crawler
///
/// Starting from search-engine results for QUERY, prowl expands over the
/// web up to MAX_URLS newly discovered pages, preferring URLs from domains
/// it has seen little of, and records every fetch attempt in a dated CSV
/// audit log.
#[derive(Parser, Debug)]
#[command(name = "prowl")]
#[command(version)]
#[command(about = "A priority-driven web crawler", long_about = None)]
struct Cli {
    /// Search query used to obtain seed URLs
    query: String,

    /// Maximum number of new URLs to admit (seeds are not counted)
    max_urls: u64,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to use instead of querying the search provider (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if cli.max_urls == 0 {
        bail!("MAX_URLS must be greater than zero");
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            config
        }
    };

    tracing::info!(
        query = %cli.query,
        max_urls = cli.max_urls,
        workers = config.crawler.workers,
        "starting crawl"
    );

    let summary = if cli.seeds.is_empty() {
        crawl(&config, &cli.query, cli.max_urls).await?
    } else {
        let provider = StaticSeeds::new(cli.seeds.clone());
        run_crawl(&config, &provider, &cli.query, cli.max_urls).await?
    };

    summary.print();
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("prowl=info,warn"),
            1 => EnvFilter::new("prowl=debug,info"),
            2 => EnvFilter::new("prowl=trace,debug"),
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
