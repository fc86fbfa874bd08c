//! CSV audit log
//!
//! One row per fetch attempt, appended under the log's own mutex with a
//! hard write cap, enforced independently of the frontier's budget.
//! Callers construct the log with `max_urls + 10` so in-flight workers can
//! still land their rows after the budget is spent.

use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Column order of the audit CSV
const HEADER: [&str; 8] = [
    "url",
    "size",
    "depth",
    "score",
    "status_code",
    "time_of_crawl",
    "allowed_to_crawl",
    "thread_name",
];

/// Timestamp format used in the `time_of_crawl` column
const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Date format used in the log file name
const DATE_FORMAT: &str = "%d-%m-%Y";

/// One audit row, in column order
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub url: String,
    pub size: u64,
    pub depth: u32,
    pub score: f64,
    pub status_code: i32,
    pub time_of_crawl: String,
    pub allowed_to_crawl: bool,
    pub thread_name: String,
}

/// Formats the current local time for an audit row
pub fn timestamp_now() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

struct AuditLogState {
    writer: csv::Writer<File>,
    writes: u64,
    write_errors: u64,
}

/// Append-only, capped CSV sink for fetch-attempt rows
pub struct AuditLog {
    inner: Mutex<AuditLogState>,
    max_writes: u64,
    path: PathBuf,
}

impl AuditLog {
    /// Creates (truncating) `crawl_log_DD-MM-YYYY.csv` in `dir` and writes
    /// the header row
    ///
    /// `max_writes` caps the number of data rows; the header does not
    /// count against it.
    pub fn create(dir: &Path, max_writes: u64) -> crate::Result<Self> {
        let file_name = format!("crawl_log_{}.csv", Local::now().format(DATE_FORMAT));
        let path = dir.join(file_name);

        let file = File::create(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;

        tracing::info!(path = %path.display(), max_writes, "audit log created");

        Ok(Self {
            inner: Mutex::new(AuditLogState {
                writer,
                writes: 0,
                write_errors: 0,
            }),
            max_writes,
            path,
        })
    }

    /// Appends one row unless the cap has been reached
    ///
    /// Write failures increment the error counter and are otherwise
    /// swallowed; the crawl never stops over a bad log write.
    pub fn append(&self, record: &AuditRecord) {
        let mut state = self.lock();

        if state.writes >= self.max_writes {
            tracing::debug!(url = %record.url, "audit log cap reached, row dropped");
            return;
        }

        let result = match state.writer.serialize(record) {
            Ok(()) => state.writer.flush().map_err(csv::Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => state.writes += 1,
            Err(e) => {
                state.write_errors += 1;
                tracing::warn!(url = %record.url, error = %e, "audit log write failed");
            }
        }
    }

    /// Flushes buffered rows to disk
    pub fn close(&self) {
        let mut state = self.lock();
        if let Err(e) = state.writer.flush() {
            state.write_errors += 1;
            tracing::warn!(error = %e, "audit log flush failed");
        }
    }

    /// Data rows written so far
    pub fn writes(&self) -> u64 {
        self.lock().writes
    }

    /// Failed write attempts so far
    pub fn write_errors(&self) -> u64 {
        self.lock().write_errors
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, AuditLogState> {
        self.inner.lock().expect("audit log lock poisoned")
    }
}
