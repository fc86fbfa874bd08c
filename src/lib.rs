//! Prowl: a priority-driven web crawler
//!
//! This crate implements a bounded web crawl that starts from search-engine
//! seed URLs and expands outward, preferring pages scored high on a blend of
//! per-domain novelty and per-URL importance. Every fetch attempt is recorded
//! in a capped CSV audit log.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod robots;
pub mod seeds;
pub mod url;

use thiserror::Error;

/// Main error type for prowl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed lookup failed: {0}")]
    Seed(#[from] SeedError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Audit log error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors surfaced by a single page fetch
///
/// The worker loop absorbs all of these into audit rows; nothing above it
/// ever observes a fetch-time error.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A response arrived carrying a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// No response at all: timeout, DNS failure, refused connection,
    /// or an unfetchable URL.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// A 200 response whose body was not valid UTF-8.
    #[error("Body of status-{status} response is not valid UTF-8")]
    Decode { status: u16 },
}

/// Seed provider errors
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No seed URLs produced for query: {0}")]
    Empty(String),
}

/// Result type alias for prowl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use frontier::{Frontier, FrontierItem};
pub use output::AuditLog;
pub use robots::RobotsGate;
pub use url::{extract_domain, normalize_link, origin_of};
