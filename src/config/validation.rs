use crate::config::types::{
    Config, CrawlerConfig, InputConfig, LeaderboardConfig, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Upper bound on the concurrency ceiling
const MAX_CONCURRENCY: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_leaderboard_config(&config.leaderboard)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrency
        )));
    }

    if config.limit_per_host < 1 {
        return Err(ConfigError::Validation(format!(
            "limit-per-host must be >= 1, got {}",
            config.limit_per_host
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates the leaderboard page range and windows
fn validate_leaderboard_config(config: &LeaderboardConfig) -> Result<(), ConfigError> {
    if config.first_page < 1 {
        return Err(ConfigError::Validation(
            "leaderboard first-page must be >= 1".to_string(),
        ));
    }

    if config.first_page > config.last_page {
        return Err(ConfigError::Validation(format!(
            "leaderboard first-page ({}) must not exceed last-page ({})",
            config.first_page, config.last_page
        )));
    }

    let mut seen = HashSet::new();
    for window in &config.windows {
        if !seen.insert(window) {
            return Err(ConfigError::Validation(format!(
                "leaderboard window '{}' is listed more than once",
                window.path_segment()
            )));
        }
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.seeds_path.is_empty() {
        return Err(ConfigError::Validation(
            "seeds-path cannot be empty".to_string(),
        ));
    }

    if config.seed_column.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed-column cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.handles_path.is_empty() {
        return Err(ConfigError::Validation(
            "handles-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
