//! Output module for prowl
//!
//! The audit log is the crawler's only sink: a capped CSV file with one
//! row per fetch attempt, plus a summary struct reported at end of run.

mod audit;
mod stats;

pub use audit::{timestamp_now, AuditLog, AuditRecord};
pub use stats::CrawlSummary;
