//! Crawler module for prowl
//!
//! Contains the crawl pipeline: HTTP fetching, anchor extraction, the
//! worker loop, and the bootstrap coordination that ties frontier, robots
//! gate, and audit log together.

mod coordinator;
mod fetcher;
mod parser;
mod worker;

pub use coordinator::run_crawl;
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::extract_anchors;
pub use worker::LOG_SLACK;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::seeds::SearchSeeds;
use crate::Result;
use std::time::Duration;

/// Runs a crawl seeded from the default search provider
///
/// This is the entry point the binary uses. Library callers that need a
/// different seed source (a fixed list, a test fixture) call
/// [`run_crawl`] with their own provider.
pub async fn crawl(config: &Config, query: &str, max_urls: u64) -> Result<CrawlSummary> {
    let timeout = Duration::from_secs(config.crawler.fetch_timeout_secs);
    let client = build_http_client(&config.user_agent, timeout)?;
    let provider = SearchSeeds::new(client);

    run_crawl(config, &provider, query, max_urls).await
}
