//! Configuration module for prowl
//!
//! Loads the optional TOML configuration file, applies defaults for missing
//! sections, and validates the result.

mod types;

pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.workers < 1 || config.crawler.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.crawler.workers
        )));
    }

    if config.crawler.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch-timeout-secs must be >= 1, got {}",
            config.crawler.fetch_timeout_secs
        )));
    }

    if config.user_agent.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if config.output.log_dir.is_empty() {
        return Err(ConfigError::Validation(
            "log-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
