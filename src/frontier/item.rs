use std::cmp::Ordering;
use std::time::Instant;

/// A URL queued for fetching with priority information
///
/// `enqueued_at` is the instant the item entered the queue; the dequeue
/// protocol compares it against the domain's last novelty update to detect
/// items whose score has gone stale while they waited.
#[derive(Debug, Clone)]
pub struct FrontierItem {
    /// Priority score at enqueue time (higher is fetched first)
    pub score: f64,

    /// The URL to fetch
    pub url: String,

    /// The domain (authority) of this URL
    pub domain: String,

    /// When this item was pushed onto the queue
    pub enqueued_at: Instant,

    /// Link depth from the seed set
    pub depth: u32,

    /// Verdict of the robots gate at discovery time
    pub robot_allowed: bool,
}

// Max-heap ordering: the highest score pops first. Ties resolve by URL so
// the pop order is deterministic.
impl Ord for FrontierItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.url.as_str().cmp(self.url.as_str()))
    }
}

impl PartialOrd for FrontierItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierItem {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.url == other.url
    }
}

impl Eq for FrontierItem {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn item(url: &str, score: f64) -> FrontierItem {
        FrontierItem {
            score,
            url: url.to_string(),
            domain: "a.test".to_string(),
            enqueued_at: Instant::now(),
            depth: 0,
            robot_allowed: true,
        }
    }

    #[test]
    fn test_highest_score_pops_first() {
        let mut heap = BinaryHeap::new();
        heap.push(item("http://a.test/low", 10.0));
        heap.push(item("http://a.test/high", 60.0));
        heap.push(item("http://a.test/mid", 42.5));

        assert_eq!(heap.pop().unwrap().url, "http://a.test/high");
        assert_eq!(heap.pop().unwrap().url, "http://a.test/mid");
        assert_eq!(heap.pop().unwrap().url, "http://a.test/low");
    }

    #[test]
    fn test_tie_breaks_by_url() {
        let mut heap = BinaryHeap::new();
        heap.push(item("http://a.test/b", 60.0));
        heap.push(item("http://a.test/a", 60.0));

        assert_eq!(heap.pop().unwrap().url, "http://a.test/a");
    }

    #[test]
    fn test_negative_scores_order() {
        // Novelty is not floored, so scores can go negative
        let mut heap = BinaryHeap::new();
        heap.push(item("http://a.test/x", -40.0));
        heap.push(item("http://a.test/y", -5.0));

        assert_eq!(heap.pop().unwrap().url, "http://a.test/y");
    }
}
