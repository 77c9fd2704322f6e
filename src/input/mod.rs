//! Crawl inputs: seed films and leaderboard pages
//!
//! Seeds are read once at startup from a CSV file with a header row.
//! Leaderboard pages are enumerated from the configuration.

mod leaderboard;

pub use leaderboard::{enumerate_leaderboard_pages, LeaderboardPageRef};

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the seed list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Seed file has no header row")]
    MissingHeader,

    #[error("Seed file has no '{0}' column")]
    MissingColumn(String),
}

/// A film whose members listing is crawled
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedItem(String);

impl SeedItem {
    /// Creates a seed from a film slug
    ///
    /// Returns `None` for blank slugs and slugs containing a `/`.
    pub fn new(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        if slug.is_empty() || slug.contains('/') {
            return None;
        }
        Some(Self(slug.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loads seed films from a CSV file
///
/// # Arguments
///
/// * `path` - Path to the CSV file
/// * `column` - Header of the column holding the film slug
///
/// # Returns
///
/// * `Ok(Vec<SeedItem>)` - Seeds in file order, duplicates removed
/// * `Err(InputError)` - The file could not be read or lacks the column
pub fn load_seed_items(path: &Path, column: &str) -> Result<Vec<SeedItem>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_seed_items(&content, column)
}

/// Parses seed films from CSV text with a header row
pub fn parse_seed_items(content: &str, column: &str) -> Result<Vec<SeedItem>, InputError> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let header = lines.next().ok_or(InputError::MissingHeader)?;
    let index = split_record(header)
        .iter()
        .position(|name| name == column.trim())
        .ok_or_else(|| InputError::MissingColumn(column.to_string()))?;

    let mut seen = std::collections::HashSet::new();
    let mut seeds = Vec::new();

    for (row, line) in lines.enumerate() {
        let fields = split_record(line);
        let Some(raw) = fields.get(index) else {
            tracing::warn!("Seed row {} has no '{}' field, skipping", row + 2, column);
            continue;
        };

        match SeedItem::new(raw) {
            Some(seed) => {
                if seen.insert(seed.clone()) {
                    seeds.push(seed);
                }
            }
            None => tracing::debug!("Skipping unusable seed '{}' on row {}", raw, row + 2),
        }
    }

    Ok(seeds)
}

/// Splits one CSV record into trimmed fields, honoring double quotes
pub(crate) fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
