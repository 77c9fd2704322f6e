//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires the crawl together:
//! - Loading seed films and opening the handle store (fatal on failure)
//! - Building the shared HTTP client, limiter and sink
//! - Launching one task per seed film and one per leaderboard page
//! - Awaiting every task and summarizing the run

use crate::config::Config;
use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::leaderboard::run_leaderboard_page;
use crate::crawler::limiter::Limiter;
use crate::crawler::pagination::run_seed;
use crate::input::{enumerate_leaderboard_pages, load_seed_items, LeaderboardPageRef, SeedItem};
use crate::output::{CrawlStats, CrawlSummary};
use crate::storage::{open_store, DedupSink, HandleStore};
use crate::url::SiteUrls;
use crate::HarvestError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    seeds: Vec<SeedItem>,
    leaderboard_pages: Vec<LeaderboardPageRef>,
    context: Arc<CrawlContext>,
}

impl Coordinator {
    /// Creates a coordinator from configuration
    ///
    /// Reads the seed file and opens the handle store. Either failing aborts
    /// before any request is made.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Seeds, store or HTTP client could not be set up
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let seeds = load_seed_items(
            Path::new(&config.input.seeds_path),
            &config.input.seed_column,
        )?;
        tracing::info!(
            "Loaded {} seed films from {}",
            seeds.len(),
            config.input.seeds_path
        );

        let store = open_store(&config.output)?;
        Self::from_parts(&config, seeds, store)
    }

    /// Creates a coordinator from already loaded seeds and an open store
    pub fn from_parts(
        config: &Config,
        seeds: Vec<SeedItem>,
        store: Box<dyn HandleStore>,
    ) -> Result<Self, HarvestError> {
        let sink = DedupSink::open(store)?;
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        let urls = SiteUrls::new(&config.crawler.base_url)?;

        let context = CrawlContext {
            fetcher: Fetcher::new(client),
            limiter: Limiter::new(config.crawler.max_concurrency as usize),
            sink,
            urls,
            stats: CrawlStats::new(),
        };

        Ok(Self {
            seeds,
            leaderboard_pages: enumerate_leaderboard_pages(&config.leaderboard),
            context: Arc::new(context),
        })
    }

    pub fn seeds(&self) -> &[SeedItem] {
        &self.seeds
    }

    pub fn leaderboard_pages(&self) -> &[LeaderboardPageRef] {
        &self.leaderboard_pages
    }

    pub fn sink(&self) -> &DedupSink {
        &self.context.sink
    }

    /// Runs the crawl to completion
    ///
    /// All seed films and leaderboard pages are launched together and
    /// awaited jointly. Individual failures are logged and counted; they
    /// never stop other tasks.
    pub async fn run(&self) -> CrawlSummary {
        let start = Instant::now();
        tracing::info!(
            "Starting scrape: {} seed films, {} leaderboard pages, concurrency {}",
            self.seeds.len(),
            self.leaderboard_pages.len(),
            self.context.limiter.capacity()
        );

        let mut tasks = JoinSet::new();

        for seed in &self.seeds {
            tasks.spawn(run_seed(Arc::clone(&self.context), seed.clone()));
        }

        for page_ref in &self.leaderboard_pages {
            tasks.spawn(run_leaderboard_page(Arc::clone(&self.context), *page_ref));
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Crawl task did not finish: {}", e);
            }
        }

        let summary = self
            .context
            .stats
            .summarize(start.elapsed(), self.context.limiter.peak_in_flight());

        if summary.failed_fetches() > 0 || summary.seeds_failed > 0 {
            tracing::warn!(
                "{} page fetches failed, {} seed films skipped",
                summary.failed_fetches(),
                summary.seeds_failed
            );
        }
        tracing::info!(
            "Completed in {:?}: {} new users recorded",
            summary.elapsed,
            summary.handles_recorded
        );

        summary
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use letterboxd_harvest::config::load_config;
/// use letterboxd_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_crawl(config).await?;
/// println!("{} new users", summary.handles_recorded);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CrawlerConfig, InputConfig, LeaderboardConfig, LeaderboardWindow, OutputConfig,
        StoreBackend, UserAgentConfig,
    };
    use crate::storage::SqliteHandleStore;
    use tempfile::TempDir;

    fn create_test_config(dir: &TempDir) -> Config {
        Config {
            crawler: CrawlerConfig {
                base_url: "http://127.0.0.1:9/".to_string(),
                max_concurrency: 2,
                limit_per_host: 4,
                request_timeout_secs: Some(5),
            },
            user_agent: UserAgentConfig::default(),
            leaderboard: LeaderboardConfig {
                first_page: 1,
                last_page: 3,
                windows: vec![LeaderboardWindow::Weekly, LeaderboardWindow::Monthly],
            },
            input: InputConfig {
                seeds_path: dir.path().join("films.csv").display().to_string(),
                seed_column: "film_id".to_string(),
            },
            output: OutputConfig {
                handles_path: dir.path().join("users.csv").display().to_string(),
                backend: StoreBackend::Csv,
            },
        }
    }

    #[test]
    fn test_missing_seed_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir);

        let result = Coordinator::new(config);
        assert!(matches!(result, Err(HarvestError::Input(_))));
    }

    #[test]
    fn test_unopenable_store_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = create_test_config(&dir);
        std::fs::write(&config.input.seeds_path, "film_id\nfilm-a\n").unwrap();
        config.output.handles_path = dir.path().join("missing/users.csv").display().to_string();

        let result = Coordinator::new(config);
        assert!(matches!(result, Err(HarvestError::Storage(_))));
    }

    #[test]
    fn test_new_loads_seeds_and_enumerates_leaderboards() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir);
        std::fs::write(&config.input.seeds_path, "film_id\nfilm-a\nfilm-b\n").unwrap();

        let coordinator = Coordinator::new(config).unwrap();
        assert_eq!(coordinator.seeds().len(), 2);
        assert_eq!(coordinator.leaderboard_pages().len(), 6);
    }

    #[tokio::test]
    async fn test_run_with_nothing_to_do() {
        let dir = TempDir::new().unwrap();
        let mut config = create_test_config(&dir);
        config.leaderboard.windows.clear();

        let store = Box::new(SqliteHandleStore::open_in_memory().unwrap());
        let coordinator = Coordinator::from_parts(&config, vec![], store).unwrap();
        let summary = coordinator.run().await;

        assert_eq!(summary.handles_forwarded, 0);
        assert_eq!(summary.peak_in_flight, 0);
    }
}
