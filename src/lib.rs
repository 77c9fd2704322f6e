//! Letterboxd-Harvest: a bounded-concurrency handle crawler
//!
//! This crate discovers member handles by paginating through the "members"
//! listings of a set of seed films and through the popular-members
//! leaderboards, recording every newly seen handle exactly once in a durable
//! store.

pub mod config;
pub mod crawler;
pub mod input;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Letterboxd-Harvest operations
///
/// Only failures that abort a run before any work is launched end up here.
/// Fetch failures for individual pages are handled where they occur.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed input error: {0}")]
    Input(#[from] input::InputError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Letterboxd-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use input::SeedItem;
pub use storage::DedupSink;
pub use url::Handle;
