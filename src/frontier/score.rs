//! Priority scoring tables
//!
//! A URL's priority blends how fresh its domain still is (novelty) with how
//! often the URL keeps turning up (importance):
//!
//! ```text
//! score(url) = 0.5 * novelty(domain(url)) + importance(url)
//! ```
//!
//! Novelty starts at 100 per domain and drops by 5 for every new URL
//! admitted from that domain; it is not floored and may go negative.
//! Importance starts at 10 per URL and grows by 10 on each rediscovery that
//! happens before the URL is visited.

use std::collections::HashMap;
use std::time::Instant;

/// Novelty a domain starts with when first seen
pub const INITIAL_NOVELTY: f64 = 100.0;

/// How much each admitted URL erodes its domain's novelty
pub const NOVELTY_DECAY: f64 = 5.0;

/// Importance granted per discovery of a URL
pub const IMPORTANCE_STEP: u64 = 10;

/// Per-domain novelty record
///
/// `last_updated` advances on every novelty change; queued items older than
/// this stamp carry an obsolete score.
#[derive(Debug, Clone)]
pub struct DomainNovelty {
    pub score: f64,
    pub last_updated: Instant,
}

/// The novelty and importance tables behind the scorer
///
/// Lives inside the frontier's mutex; all methods assume the caller already
/// holds that lock.
#[derive(Debug, Default)]
pub struct ScoreBook {
    novelty: HashMap<String, DomainNovelty>,
    importance: HashMap<String, u64>,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the priority score for a URL
    ///
    /// Missing table entries are created before the read (novelty at 100
    /// with a current stamp, importance at 10). That write-through is what
    /// guarantees every queued item's domain has a novelty entry, which the
    /// dequeue staleness check relies on.
    pub fn score(&mut self, url: &str, domain: &str) -> f64 {
        let novelty = self
            .novelty
            .entry(domain.to_string())
            .or_insert_with(|| DomainNovelty {
                score: INITIAL_NOVELTY,
                last_updated: Instant::now(),
            })
            .score;

        let importance = *self
            .importance
            .entry(url.to_string())
            .or_insert(IMPORTANCE_STEP);

        0.5 * novelty + importance as f64
    }

    /// Records a budget-consuming admission of a new URL
    ///
    /// The domain's novelty is decremented (or created at 100) and its
    /// stamp advanced, marking every older queued item from this domain as
    /// stale. The URL's importance is bumped (or created at 10).
    pub fn record_admission(&mut self, url: &str, domain: &str) {
        let now = Instant::now();

        self.novelty
            .entry(domain.to_string())
            .and_modify(|n| {
                n.score -= NOVELTY_DECAY;
                n.last_updated = now;
            })
            .or_insert_with(|| DomainNovelty {
                score: INITIAL_NOVELTY,
                last_updated: now,
            });

        *self.importance.entry(url.to_string()).or_insert(0) += IMPORTANCE_STEP;
    }

    /// The instant of the domain's most recent novelty change, if any
    pub fn last_novelty_update(&self, domain: &str) -> Option<Instant> {
        self.novelty.get(domain).map(|n| n.last_updated)
    }

    /// Current novelty of a domain, if an entry exists
    pub fn novelty_of(&self, domain: &str) -> Option<f64> {
        self.novelty.get(domain).map(|n| n.score)
    }

    /// Current importance of a URL, if an entry exists
    pub fn importance_of(&self, url: &str) -> Option<u64> {
        self.importance.get(url).copied()
    }

    #[cfg(test)]
    pub fn set_novelty_stamp(&mut self, domain: &str, stamp: Instant) {
        if let Some(entry) = self.novelty.get_mut(domain) {
            entry.last_updated = stamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_score_in_domain() {
        let mut book = ScoreBook::new();
        let score = book.score("http://a.test/", "a.test");
        assert_eq!(score, 0.5 * 100.0 + 10.0);
        // The read created both entries
        assert_eq!(book.novelty_of("a.test"), Some(100.0));
        assert_eq!(book.importance_of("http://a.test/"), Some(10));
    }

    #[test]
    fn test_admission_decays_novelty() {
        let mut book = ScoreBook::new();
        book.record_admission("http://a.test/1", "a.test");
        assert_eq!(book.novelty_of("a.test"), Some(100.0));

        book.record_admission("http://a.test/2", "a.test");
        assert_eq!(book.novelty_of("a.test"), Some(95.0));

        book.record_admission("http://a.test/3", "a.test");
        assert_eq!(book.novelty_of("a.test"), Some(90.0));
    }

    #[test]
    fn test_novelty_goes_negative() {
        let mut book = ScoreBook::new();
        for i in 0..41 {
            book.record_admission(&format!("http://a.test/{i}"), "a.test");
        }
        assert_eq!(book.novelty_of("a.test"), Some(100.0 - 40.0 * 5.0));
    }

    #[test]
    fn test_rediscovery_bumps_importance() {
        let mut book = ScoreBook::new();
        book.record_admission("http://a.test/x", "a.test");
        assert_eq!(book.importance_of("http://a.test/x"), Some(10));

        book.record_admission("http://a.test/x", "a.test");
        assert_eq!(book.importance_of("http://a.test/x"), Some(20));
    }

    #[test]
    fn test_score_monotone_in_importance() {
        // Holding novelty fixed, more importance means a strictly
        // higher score.
        let mut book = ScoreBook::new();
        let url = "http://a.test/x";
        let before = book.score(url, "a.test");

        *book.importance.get_mut(url).unwrap() += IMPORTANCE_STEP;
        let after = book.score(url, "a.test");
        assert!(after > before);
    }

    #[test]
    fn test_score_monotone_in_novelty() {
        // Holding importance fixed, less novelty means a strictly
        // lower score.
        let mut book = ScoreBook::new();
        let url = "http://a.test/x";
        let before = book.score(url, "a.test");

        book.novelty.get_mut("a.test").unwrap().score -= NOVELTY_DECAY;
        let after = book.score(url, "a.test");
        assert!(after < before);
    }

    #[test]
    fn test_novelty_stamp_advances_on_decay() {
        let mut book = ScoreBook::new();
        book.record_admission("http://a.test/1", "a.test");
        let first = book.last_novelty_update("a.test").unwrap();

        book.record_admission("http://a.test/2", "a.test");
        let second = book.last_novelty_update("a.test").unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_domains_score_independently() {
        let mut book = ScoreBook::new();
        for i in 0..10 {
            book.record_admission(&format!("http://a.test/{i}"), "a.test");
        }
        // b.test is untouched by a.test's decay
        assert_eq!(book.score("http://b.test/", "b.test"), 60.0);
    }
}
