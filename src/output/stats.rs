//! End-of-run summary counters

use std::time::Duration;

/// Aggregate counters reported when a crawl finishes
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// New URLs admitted against the budget
    pub total_urls: u64,

    /// Admissions rejected as duplicates
    pub duplicates: u64,

    /// Items left in the frontier when the workers exited
    pub frontier_remaining: usize,

    /// Audit rows written
    pub log_writes: u64,

    /// Audit write failures
    pub log_write_errors: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Prints the summary to stdout
    pub fn print(&self) {
        println!("Crawl finished in {:.2}s", self.elapsed.as_secs_f64());
        println!("  URLs admitted:      {}", self.total_urls);
        println!("  Duplicates seen:    {}", self.duplicates);
        println!("  Frontier remaining: {}", self.frontier_remaining);
        println!("  Audit rows written: {}", self.log_writes);
        println!("  Audit write errors: {}", self.log_write_errors);
    }
}
