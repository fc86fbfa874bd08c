//! Crawl bootstrap and worker pool management
//!
//! One-shot orchestration: obtain seeds, robots-check them in parallel,
//! seed the frontier outside the admission budget, launch the worker
//! pool, and wait for it to drain. Completion is cooperative: workers
//! exit on their own when the frontier empties or the audit cap is hit.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::worker::{run_worker, WorkerContext, LOG_SLACK};
use crate::frontier::Frontier;
use crate::output::{AuditLog, CrawlSummary};
use crate::robots::RobotsGate;
use crate::seeds::SeedProvider;
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Most seeds ever requested from the provider
const SEED_LIMIT: usize = 10;

/// Runs a complete crawl with the given seed provider
///
/// # Arguments
///
/// * `config` - Crawler configuration (worker count, timeout, UA, output)
/// * `provider` - Source of seed URLs
/// * `query` - Search query handed to the provider
/// * `max_urls` - Admission budget for newly expanded URLs; seeds are
///   admitted outside it
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The crawl ran to completion (individual fetch
///   failures are audit rows, not errors)
/// * `Err(CrawlError)` - Setup failed: bad config, unreachable seed
///   provider, or an unwritable audit log
pub async fn run_crawl(
    config: &Config,
    provider: &dyn SeedProvider,
    query: &str,
    max_urls: u64,
) -> Result<CrawlSummary> {
    let started = Instant::now();

    let timeout = Duration::from_secs(config.crawler.fetch_timeout_secs);
    let client = build_http_client(&config.user_agent, timeout)?;

    let frontier = Arc::new(Frontier::new(max_urls));
    let robots = Arc::new(RobotsGate::new(client.clone()));
    let audit = Arc::new(AuditLog::create(
        Path::new(&config.output.log_dir),
        max_urls + LOG_SLACK,
    )?);

    let seeds = provider.search(query, SEED_LIMIT).await?;
    tracing::info!(count = seeds.len(), query, "seeding frontier");

    // Robots-check all seeds concurrently before admission
    let mut checks = JoinSet::new();
    for url in seeds {
        let robots = Arc::clone(&robots);
        checks.spawn(async move {
            let allowed = robots.is_allowed(&url).await;
            (url, allowed)
        });
    }

    let mut seed_pairs = Vec::new();
    while let Some(joined) = checks.join_next().await {
        match joined {
            Ok(pair) => seed_pairs.push(pair),
            Err(e) => tracing::error!(error = %e, "seed robots check failed"),
        }
    }

    frontier.admit(&seed_pairs, false, 0);

    let ctx = Arc::new(WorkerContext {
        frontier: Arc::clone(&frontier),
        robots,
        audit: Arc::clone(&audit),
        client,
        max_urls,
    });

    let mut handles = Vec::new();
    for i in 0..config.crawler.workers {
        let ctx = Arc::clone(&ctx);
        let name = format!("worker-{i}");
        handles.push((name.clone(), tokio::spawn(run_worker(ctx, name))));
    }
    tracing::info!(workers = config.crawler.workers, "worker pool launched");

    // A worker that dies abnormally must not take its peers down; join
    // each one and report, then keep waiting on the rest.
    for (name, handle) in handles {
        if let Err(e) = handle.await {
            tracing::error!(worker = %name, error = %e, "worker terminated abnormally");
        }
    }

    audit.close();

    let counters = frontier.counters();
    let summary = CrawlSummary {
        total_urls: counters.total_urls,
        duplicates: counters.duplicates,
        frontier_remaining: counters.queued,
        log_writes: audit.writes(),
        log_write_errors: audit.write_errors(),
        elapsed: started.elapsed(),
    };

    tracing::info!(
        total_urls = summary.total_urls,
        duplicates = summary.duplicates,
        frontier_remaining = summary.frontier_remaining,
        log_writes = summary.log_writes,
        log_write_errors = summary.log_write_errors,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "crawl complete"
    );

    Ok(summary)
}
