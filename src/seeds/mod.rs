//! Seed providers
//!
//! The crawl starts from a small set of seed URLs obtained from a search
//! provider. The provider is an injectable trait so the bootstrap can be
//! driven by a live search engine, a fixed list from the command line, or
//! a test fixture.

use crate::SeedError;
use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

/// Source of seed URLs for a crawl
#[async_trait]
pub trait SeedProvider: Send + Sync {
    /// Produces up to `limit` seed URLs for the query
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SeedError>;
}

/// Seed provider backed by the DuckDuckGo HTML results page
///
/// The HTML endpoint serves plain anchors without JavaScript, which makes
/// it scrapeable with the same tooling the crawler already uses for page
/// parsing.
pub struct SearchSeeds {
    client: reqwest::Client,
}

impl SearchSeeds {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SeedProvider for SearchSeeds {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SeedError> {
        let response = self
            .client
            .get("https://html.duckduckgo.com/html/")
            .query(&[("q", query)])
            .send()
            .await?;

        let html = response.text().await?;
        let seeds = parse_results(&html, limit);

        if seeds.is_empty() {
            return Err(SeedError::Empty(query.to_string()));
        }

        tracing::info!(query, count = seeds.len(), "search seeds obtained");
        Ok(seeds)
    }
}

/// Extracts result URLs from a DuckDuckGo HTML results page
fn parse_results(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a.result__a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(decode_result_href)
        .take(limit)
        .collect()
}

/// Unwraps a result anchor href into the target URL
///
/// Result links are usually redirect URLs of the form
/// `//duckduckgo.com/l/?uddg=<percent-encoded target>`; direct http(s)
/// links pass through unchanged.
fn decode_result_href(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        return None;
    };

    let parsed = Url::parse(&absolute).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
}

/// Seed provider serving a fixed list of URLs
///
/// Backs the `--seed` command-line flag and the test suite.
pub struct StaticSeeds {
    urls: Vec<String>,
}

impl StaticSeeds {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl SeedProvider for StaticSeeds {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<String>, SeedError> {
        Ok(self.urls.iter().take(limit).cloned().collect())
    }
}
