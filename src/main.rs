//! Letterboxd-Harvest main entry point
//!
//! This is the command-line interface for the handle crawler.

use anyhow::Context;
use clap::Parser;
use letterboxd_harvest::config::{load_config_with_hash, Config};
use letterboxd_harvest::crawler::Coordinator;
use letterboxd_harvest::input::{enumerate_leaderboard_pages, load_seed_items};
use letterboxd_harvest::output::{print_store_statistics, print_summary};
use letterboxd_harvest::storage::open_store;
use letterboxd_harvest::url::SiteUrls;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Letterboxd-Harvest: discovers member handles
///
/// Crawls the members listings of a list of seed films and the popular
/// members leaderboards, appending every newly seen handle to a durable
/// store exactly once.
#[derive(Parser, Debug)]
#[command(name = "letterboxd-harvest")]
#[command(version)]
#[command(about = "Discovers member handles from film listings and leaderboards", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show how many handles the store holds and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("letterboxd_harvest=info,warn"),
            1 => EnvFilter::new("letterboxd_harvest=debug,info"),
            2 => EnvFilter::new("letterboxd_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates inputs and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Letterboxd-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!("  Connections per host: {}", config.crawler.limit_per_host);
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }
    println!("  User agent: {}", config.user_agent.header_value());

    let seeds = load_seed_items(
        Path::new(&config.input.seeds_path),
        &config.input.seed_column,
    )?;
    let urls = SiteUrls::new(&config.crawler.base_url)?;

    println!("\nSeed films ({}):", seeds.len());
    for seed in seeds.iter().take(5) {
        println!("  - {}", urls.members_page(seed, 1)?);
    }
    if seeds.len() > 5 {
        println!("  ... and {} more", seeds.len() - 5);
    }

    let pages = enumerate_leaderboard_pages(&config.leaderboard);
    println!("\nLeaderboard pages ({}):", pages.len());
    for page_ref in pages.iter().take(config.leaderboard.windows.len()) {
        println!("  - {}", urls.leaderboard_page(page_ref)?);
    }
    if pages.len() > config.leaderboard.windows.len() {
        println!(
            "  ... through page {}",
            config.leaderboard.last_page
        );
    }

    println!("\nOutput:");
    println!(
        "  Handles: {} ({:?})",
        config.output.handles_path, config.output.backend
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} seed films and {} leaderboard pages",
        seeds.len(),
        pages.len()
    );

    Ok(())
}

/// Handles the --stats mode: shows how many handles are recorded
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.output)?;
    print_store_statistics(store.as_ref())?;
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let summary = coordinator.run().await;
    print_summary(&summary);
    Ok(())
}
