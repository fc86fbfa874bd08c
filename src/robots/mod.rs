//! Robots exclusion gate
//!
//! Answers "may this URL be crawled?" with a per-URL boolean cache. On a
//! cache miss the origin's `robots.txt` is fetched over plain GET and
//! evaluated for user-agent `*`. Any failure along the way (unfetchable
//! origin, non-success status, undecodable body) falls back to allowing
//! the URL, so a broken or missing robots file never stalls the crawl.
//!
//! The cache lock is never held across the network fetch; two workers
//! racing on the same cold URL may both fetch, which is harmless.

use crate::url::origin_of;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::sync::Mutex;

/// User agent the exclusion rules are evaluated for
const ROBOTS_USER_AGENT: &str = "*";

/// Per-URL robots verdict cache backed by HTTP fetches of `robots.txt`
pub struct RobotsGate {
    client: reqwest::Client,
    cache: Mutex<HashMap<String, bool>>,
}

impl RobotsGate {
    /// Creates a gate that fetches robots files with the given client
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Whether robots rules permit crawling `url`
    ///
    /// Cached per URL: the first call for a URL fetches and evaluates its
    /// origin's robots file, later calls are lookups.
    pub async fn is_allowed(&self, url: &str) -> bool {
        if let Some(&allowed) = self.lock().get(url) {
            return allowed;
        }

        let allowed = match origin_of(url) {
            Some(origin) => match self.fetch_rules(&origin).await {
                Some(content) => evaluate(&content, url),
                None => true,
            },
            // No derivable origin: fall back to the permissive default
            None => true,
        };

        self.lock().insert(url.to_string(), allowed);
        allowed
    }

    /// Fetches the robots file for an origin, or `None` when unavailable
    async fn fetch_rules(&self, origin: &str) -> Option<String> {
        let robots_url = format!("{}/robots.txt", origin);

        let response = match self.client.get(&robots_url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %robots_url, error = %e, "robots.txt fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(url = %robots_url, status = %response.status(), "no robots.txt");
            return None;
        }

        response.text().await.ok()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, bool>> {
        self.cache.lock().expect("robots cache lock poisoned")
    }

    #[cfg(test)]
    fn prime(&self, url: &str, allowed: bool) {
        self.lock().insert(url.to_string(), allowed);
    }
}

/// Evaluates robots.txt content for user-agent `*` against a URL
fn evaluate(content: &str, url: &str) -> bool {
    if content.is_empty() {
        return true;
    }

    let mut matcher = DefaultMatcher::default();
    matcher.one_agent_allowed_by_robots(content, ROBOTS_USER_AGENT, url)
}
