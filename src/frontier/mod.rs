//! The concurrent crawl frontier
//!
//! A score-ordered queue of pending URLs plus the bookkeeping that decides
//! which item is next: the visited set, the per-domain novelty table, the
//! per-URL importance table, and the global admission budget. One coarse
//! mutex protects all of it, which makes the score/admit/requeue protocol
//! trivially atomic; workers do their network and disk I/O strictly outside
//! that lock.
//!
//! Scores are not repaired in place when a domain's novelty changes.
//! Instead, dequeue lazily detects items whose enqueue stamp predates the
//! domain's last novelty update, rescores them, and reinserts them. The
//! repair loop is bounded by an escape hatch: an item popped twice in a row
//! is accepted as-is.

mod item;
mod score;

pub use item::FrontierItem;
pub use score::{DomainNovelty, ScoreBook, IMPORTANCE_STEP, INITIAL_NOVELTY, NOVELTY_DECAY};

use crate::url::extract_domain;
use std::collections::{BinaryHeap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Snapshot of the frontier's counters, taken for end-of-run reporting
#[derive(Debug, Clone, Copy)]
pub struct FrontierCounters {
    /// New URLs admitted against the budget
    pub total_urls: u64,

    /// Admissions rejected because the URL was already seen
    pub duplicates: u64,

    /// Items still queued when the snapshot was taken
    pub queued: usize,
}

/// Everything the frontier mutex protects
struct FrontierState {
    queue: BinaryHeap<FrontierItem>,
    visited: HashSet<String>,
    scores: ScoreBook,
    total_urls: u64,
    total_urls_parsed: i64,
    duplicates: u64,
}

/// The shared crawl frontier
///
/// `max_urls` caps budget-consuming admissions (`is_new = true`). Seeds and
/// requeues are admitted outside the budget.
pub struct Frontier {
    max_urls: u64,
    inner: Mutex<FrontierState>,
}

impl Frontier {
    /// Creates an empty frontier with the given admission budget
    pub fn new(max_urls: u64) -> Self {
        Self {
            max_urls,
            inner: Mutex::new(FrontierState {
                queue: BinaryHeap::new(),
                visited: HashSet::new(),
                scores: ScoreBook::new(),
                total_urls: 0,
                total_urls_parsed: 0,
                duplicates: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.inner.lock().expect("frontier lock poisoned")
    }

    /// Admits a batch of `(url, robot_allowed)` pairs
    ///
    /// Duplicates (already in the visited set) are skipped; when `is_new`,
    /// each duplicate refunds one speculative parse slot and counts toward
    /// the duplicate total. New URLs enter the visited set and are pushed
    /// with a freshly computed score. When `is_new`, the admission also
    /// consumes budget, decays the domain's novelty, and bumps the URL's
    /// importance; a batch is abandoned at the first admission that would
    /// exceed the budget.
    ///
    /// `is_new = false` admissions are seeds and requeues: they bypass the
    /// budget entirely and always push.
    pub fn admit(&self, urls: &[(String, bool)], is_new: bool, depth: u32) {
        let mut state = self.lock();
        state.admit(urls, is_new, depth, self.max_urls);
    }

    /// Pops items until one is judged fresh and returns it
    ///
    /// An item is fresh iff it is the same URL as the item inspected just
    /// before it in this call, or its enqueue stamp is at or after its
    /// domain's last novelty update. Stale items are removed from the
    /// visited set and re-admitted (rescored, restamped, same depth), then
    /// the loop continues. Returns `None` once the queue is empty.
    pub fn dequeue_freshest(&self) -> Option<FrontierItem> {
        let mut state = self.lock();
        let mut last_url: Option<String> = None;

        loop {
            let item = state.queue.pop()?;

            let repeated = last_url.as_deref() == Some(item.url.as_str());
            let fresh = repeated
                || state
                    .scores
                    .last_novelty_update(&item.domain)
                    .map_or(true, |stamp| item.enqueued_at >= stamp);

            if fresh {
                return Some(item);
            }

            state.visited.remove(&item.url);
            last_url = Some(item.url.clone());
            state.admit(
                &[(item.url, item.robot_allowed)],
                false,
                item.depth,
                self.max_urls,
            );
        }
    }

    /// Whether the queue currently holds no items
    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Whether the admission budget is spent
    pub fn budget_exhausted(&self) -> bool {
        let state = self.lock();
        state.total_urls >= self.max_urls
    }

    /// Whether another anchor may still be extracted
    ///
    /// Bounds outstanding speculative extraction across all workers: both
    /// the pending-parse counter and the admitted total must be under the
    /// budget.
    pub fn can_extract(&self) -> bool {
        let state = self.lock();
        state.total_urls_parsed < self.max_urls as i64 && state.total_urls < self.max_urls
    }

    /// Whether a URL has already been admitted at some point
    pub fn is_visited(&self, url: &str) -> bool {
        self.lock().visited.contains(url)
    }

    /// Charges one speculative parse slot for a collected anchor
    ///
    /// Refunded inside [`Frontier::admit`] if the anchor turns out to be a
    /// duplicate.
    pub fn charge_parse_slot(&self) {
        self.lock().total_urls_parsed += 1;
    }

    /// New URLs admitted against the budget so far
    pub fn total_urls(&self) -> u64 {
        self.lock().total_urls
    }

    /// Counter snapshot for reporting
    pub fn counters(&self) -> FrontierCounters {
        let state = self.lock();
        FrontierCounters {
            total_urls: state.total_urls,
            duplicates: state.duplicates,
            queued: state.queue.len(),
        }
    }

    #[cfg(test)]
    fn set_novelty_stamp(&self, domain: &str, stamp: Instant) {
        self.lock().scores.set_novelty_stamp(domain, stamp);
    }

    #[cfg(test)]
    fn novelty_of(&self, domain: &str) -> Option<f64> {
        self.lock().scores.novelty_of(domain)
    }

    #[cfg(test)]
    fn importance_of(&self, url: &str) -> Option<u64> {
        self.lock().scores.importance_of(url)
    }
}

impl FrontierState {
    fn admit(&mut self, urls: &[(String, bool)], is_new: bool, depth: u32, max_urls: u64) {
        for (url, robot_allowed) in urls {
            if self.visited.contains(url) {
                if is_new {
                    // Refund the speculative slot the collector charged
                    self.total_urls_parsed -= 1;
                    self.duplicates += 1;
                    tracing::trace!(url = %url, "duplicate admission rejected");
                }
                continue;
            }

            self.visited.insert(url.clone());
            let domain = extract_domain(url);

            if is_new {
                if self.total_urls >= max_urls {
                    tracing::debug!(url = %url, "budget spent, abandoning batch");
                    return;
                }
                self.total_urls += 1;
                self.scores.record_admission(url, &domain);
            }

            let score = self.scores.score(url, &domain);
            self.queue.push(FrontierItem {
                score,
                url: url.clone(),
                domain,
                enqueued_at: Instant::now(),
                depth,
                robot_allowed: *robot_allowed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pairs(urls: &[&str]) -> Vec<(String, bool)> {
        urls.iter().map(|u| (u.to_string(), true)).collect()
    }

    #[test]
    fn test_seed_admission_bypasses_budget() {
        let frontier = Frontier::new(5);
        frontier.admit(&pairs(&["http://a.test/", "http://b.test/"]), false, 0);

        assert_eq!(frontier.total_urls(), 0);
        assert_eq!(frontier.counters().queued, 2);
        assert!(frontier.is_visited("http://a.test/"));
    }

    #[test]
    fn test_first_admission_scores_sixty() {
        let frontier = Frontier::new(5);
        frontier.admit(&pairs(&["http://a.test/"]), false, 0);

        let item = frontier.dequeue_freshest().unwrap();
        assert_eq!(item.url, "http://a.test/");
        assert_eq!(item.score, 60.0);
        assert_eq!(item.depth, 0);
    }

    #[test]
    fn test_child_after_one_decay_scores_57_5() {
        let frontier = Frontier::new(5);
        frontier.admit(&pairs(&["http://a.test/"]), false, 0);
        frontier.dequeue_freshest().unwrap();

        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://a.test/x"]), true, 1);

        assert_eq!(frontier.novelty_of("a.test"), Some(95.0));
        let item = frontier.dequeue_freshest().unwrap();
        assert_eq!(item.url, "http://a.test/x");
        assert_eq!(item.score, 0.5 * 95.0 + 10.0);
        assert_eq!(item.depth, 1);
    }

    #[test]
    fn test_cross_domain_children_score_sixty() {
        let frontier = Frontier::new(10);
        frontier.charge_parse_slot();
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://b.test/1", "http://c.test/1"]), true, 1);

        let first = frontier.dequeue_freshest().unwrap();
        let second = frontier.dequeue_freshest().unwrap();
        assert_eq!(first.score, 60.0);
        assert_eq!(second.score, 60.0);
    }

    #[test]
    fn test_budget_cap_abandons_batch() {
        let frontier = Frontier::new(2);
        let batch: Vec<_> = (0..50)
            .map(|i| (format!("http://d{i}.test/"), true))
            .collect();
        for _ in 0..batch.len() {
            frontier.charge_parse_slot();
        }
        frontier.admit(&batch, true, 1);

        assert_eq!(frontier.total_urls(), 2);
        assert_eq!(frontier.counters().queued, 2);
        assert!(frontier.budget_exhausted());
    }

    #[test]
    fn test_cap_holds_across_batches() {
        let frontier = Frontier::new(3);
        for i in 0..10 {
            frontier.charge_parse_slot();
            frontier.admit(&pairs(&[format!("http://d{i}.test/").as_str()]), true, 1);
        }
        assert_eq!(frontier.total_urls(), 3);
    }

    #[test]
    fn test_duplicate_refunds_parse_slot() {
        let frontier = Frontier::new(10);
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://a.test/x"]), true, 1);

        // Same URL collected again by another page
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://a.test/x"]), true, 2);

        let counters = frontier.counters();
        assert_eq!(counters.duplicates, 1);
        assert_eq!(counters.queued, 1);
        assert_eq!(frontier.total_urls(), 1);
        // Importance does not bump on a visited-set rejection
        assert_eq!(frontier.importance_of("http://a.test/x"), Some(10));
    }

    #[test]
    fn test_can_extract_tracks_both_counters() {
        let frontier = Frontier::new(2);
        assert!(frontier.can_extract());

        frontier.charge_parse_slot();
        frontier.charge_parse_slot();
        // Pending speculative work alone exhausts extraction
        assert!(!frontier.can_extract());

        frontier.admit(&pairs(&["http://a.test/1", "http://a.test/2"]), true, 1);
        // Slots consumed by admission; the admitted total now blocks
        assert!(!frontier.can_extract());
    }

    #[test]
    fn test_dequeue_empty_returns_none() {
        let frontier = Frontier::new(5);
        assert!(frontier.dequeue_freshest().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_stale_item_is_rescored() {
        let frontier = Frontier::new(10);
        frontier.admit(&pairs(&["http://d.test/old"]), false, 0);

        // Later admissions decay d.test's novelty and advance its stamp,
        // making the queued seed stale.
        frontier.charge_parse_slot();
        frontier.charge_parse_slot();
        frontier.charge_parse_slot();
        frontier.admit(
            &pairs(&["http://d.test/1", "http://d.test/2", "http://d.test/3"]),
            true,
            1,
        );
        assert_eq!(frontier.novelty_of("d.test"), Some(85.0));

        // Every dequeued item must satisfy the freshness rule, carry a
        // score no higher than the decayed maximum, and all four URLs
        // drain exactly once. The seed's original 60 must never surface.
        let mut seen = Vec::new();
        while let Some(item) = frontier.dequeue_freshest() {
            assert!(
                item.enqueued_at >= frontier.lock().scores.last_novelty_update("d.test").unwrap()
            );
            assert!(item.score <= 0.5 * 95.0 + 10.0);
            seen.push(item.url);
        }
        seen.sort();
        assert_eq!(
            seen,
            vec![
                "http://d.test/1",
                "http://d.test/2",
                "http://d.test/3",
                "http://d.test/old"
            ]
        );
    }

    #[test]
    fn test_requeue_restores_visited_membership() {
        let frontier = Frontier::new(10);
        frontier.admit(&pairs(&["http://d.test/x"]), false, 0);
        frontier.set_novelty_stamp("d.test", Instant::now() + Duration::from_millis(1));

        // Stale on first inspection, requeued, and still visited afterwards
        let item = frontier.dequeue_freshest().unwrap();
        assert_eq!(item.url, "http://d.test/x");
        assert!(frontier.is_visited("http://d.test/x"));
    }

    #[test]
    fn test_same_url_twice_escape_hatch() {
        let frontier = Frontier::new(10);
        frontier.admit(&pairs(&["http://d.test/x"]), false, 0);

        // Pin the novelty stamp far in the future so the timestamp rule
        // can never pass; only the repeated-URL rule can terminate.
        frontier.set_novelty_stamp("d.test", Instant::now() + Duration::from_secs(3600));

        let item = frontier.dequeue_freshest().unwrap();
        assert_eq!(item.url, "http://d.test/x");
    }

    #[test]
    fn test_requeue_does_not_consume_budget() {
        let frontier = Frontier::new(1);
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://d.test/x"]), true, 1);
        assert_eq!(frontier.total_urls(), 1);

        frontier.set_novelty_stamp("d.test", Instant::now() + Duration::from_millis(1));
        let item = frontier.dequeue_freshest().unwrap();
        assert_eq!(item.url, "http://d.test/x");
        assert_eq!(frontier.total_urls(), 1);
    }

    #[test]
    fn test_queued_items_outrank_by_score() {
        let frontier = Frontier::new(10);
        // Two fresh domains (60 each), then more a.test URLs pushing its
        // novelty down.
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://a.test/1"]), true, 1);
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://a.test/2"]), true, 1);
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["http://b.test/1"]), true, 1);

        // b.test is untouched by a.test admissions: it pops first at 60
        let first = frontier.dequeue_freshest().unwrap();
        assert_eq!(first.domain, "b.test");
        assert_eq!(first.score, 60.0);
    }

    #[test]
    fn test_unparseable_url_admitted_under_empty_domain() {
        // Opaque leftovers from the normalizer still flow through the
        // frontier; they fail later at fetch time.
        let frontier = Frontier::new(5);
        frontier.charge_parse_slot();
        frontier.admit(&pairs(&["sibling.html"]), true, 1);

        let item = frontier.dequeue_freshest().unwrap();
        assert_eq!(item.url, "sibling.html");
        assert_eq!(item.domain, "");
    }

    #[test]
    fn test_concurrent_admissions_respect_cap() {
        use std::sync::Arc;

        let frontier = Arc::new(Frontier::new(25));
        let mut handles = Vec::new();
        for worker in 0..8 {
            let frontier = Arc::clone(&frontier);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    frontier.charge_parse_slot();
                    frontier.admit(
                        &[(format!("http://w{worker}.test/{i}"), true)],
                        true,
                        1,
                    );
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(frontier.total_urls(), 25);
    }
}
