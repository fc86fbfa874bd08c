//! Worker loop
//!
//! Each worker repeats: dequeue the freshest item, fetch it outside every
//! lock, append one audit row, and, when the page is crawlable text,
//! extract its anchors and admit the survivors as a batch. All recoverable
//! failures are absorbed here as audit rows or skipped anchors; nothing
//! above the loop observes them.

use crate::crawler::fetcher::{fetch_page, FetchedPage};
use crate::crawler::parser::extract_anchors;
use crate::frontier::{Frontier, FrontierItem};
use crate::output::{timestamp_now, AuditLog, AuditRecord};
use crate::robots::RobotsGate;
use crate::url::{normalize_link, origin_of};
use crate::FetchError;
use std::sync::Arc;

/// Extra audit rows allowed beyond the admission budget, covering workers
/// that were already in flight when the budget ran out
pub const LOG_SLACK: u64 = 10;

/// Shared handles a worker operates on
pub struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub robots: Arc<RobotsGate>,
    pub audit: Arc<AuditLog>,
    pub client: reqwest::Client,
    pub max_urls: u64,
}

/// Runs one worker to completion
///
/// The worker exits when the frontier is empty at loop head or the audit
/// log has reached its cap. Both checks are racy against peers pushing
/// more work, which can only make the crawl finish early, never exceed a
/// cap.
pub async fn run_worker(ctx: Arc<WorkerContext>, name: String) {
    tracing::debug!(worker = %name, "worker started");

    loop {
        if ctx.audit.writes() >= ctx.max_urls + LOG_SLACK {
            tracing::debug!(worker = %name, "audit cap reached, exiting");
            break;
        }

        let Some(item) = ctx.frontier.dequeue_freshest() else {
            tracing::debug!(worker = %name, "frontier empty, exiting");
            break;
        };

        let outcome = fetch_page(&ctx.client, &item.url).await;
        ctx.audit.append(&audit_row(&item, &outcome, &name));

        let page = match outcome {
            Ok(page) if page.mime_major == "text" => page,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(worker = %name, url = %item.url, error = %e, "fetch failed");
                continue;
            }
        };

        // Extraction gate: spent budget or a robots-denied page yields no
        // children. The page itself was still fetched and logged above.
        if ctx.frontier.budget_exhausted() || !item.robot_allowed {
            continue;
        }

        let batch = collect_children(&ctx, &item, &page).await;
        ctx.frontier.admit(&batch, true, item.depth + 1);
    }
}

/// Walks the page's anchors in source order and collects admissible
/// children
///
/// Each candidate charges one speculative parse slot before it enters the
/// batch, bounding extraction across all workers; duplicates refund the
/// slot inside `admit`.
async fn collect_children(
    ctx: &WorkerContext,
    item: &FrontierItem,
    page: &FetchedPage,
) -> Vec<(String, bool)> {
    let mut batch = Vec::new();

    for href in extract_anchors(&page.body) {
        if !ctx.frontier.can_extract() {
            tracing::debug!(worker_url = %item.url, "extraction budget spent, stopping");
            break;
        }

        let Some(full) = normalize_link(&item.url, &href) else {
            continue;
        };

        if ctx.frontier.is_visited(&full) {
            continue;
        }

        // Relative or opaque leftovers have no origin to evaluate robots
        // against; skip them like any other malformed anchor.
        if origin_of(&full).is_none() {
            continue;
        }

        let allowed = ctx.robots.is_allowed(&full).await;
        ctx.frontier.charge_parse_slot();
        batch.push((full, allowed));
    }

    batch
}

/// Shapes the audit row for one fetch attempt
///
/// Sizes and statuses follow the failure class: transport failures log
/// status `-1`, HTTP and decode failures log the real status, and all
/// failures log size 0.
fn audit_row(
    item: &FrontierItem,
    outcome: &Result<FetchedPage, FetchError>,
    worker: &str,
) -> AuditRecord {
    let (size, status_code) = match outcome {
        Ok(page) => (page.body.len() as u64, page.status as i32),
        Err(FetchError::Status(code)) => (0, *code as i32),
        Err(FetchError::Decode { status }) => (0, *status as i32),
        Err(FetchError::Transport(_)) => (0, -1),
    };

    AuditRecord {
        url: item.url.clone(),
        size,
        depth: item.depth,
        score: item.score,
        status_code,
        time_of_crawl: timestamp_now(),
        allowed_to_crawl: item.robot_allowed,
        thread_name: worker.to_string(),
    }
}
