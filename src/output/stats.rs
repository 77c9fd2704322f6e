//! Crawl statistics
//!
//! Counters are updated by every crawl task as it runs and turned into a
//! `CrawlSummary` once all tasks have finished.

use crate::storage::HandleStore;
use crate::storage::StorageResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters shared by all crawl tasks
#[derive(Debug, Default)]
pub struct CrawlStats {
    seeds_completed: AtomicU64,
    seeds_failed: AtomicU64,
    member_pages_fetched: AtomicU64,
    member_pages_failed: AtomicU64,
    leaderboard_pages_fetched: AtomicU64,
    leaderboard_pages_failed: AtomicU64,
    handles_forwarded: AtomicU64,
    handles_recorded: AtomicU64,
    storage_errors: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_completed(&self) {
        bump(&self.seeds_completed);
    }

    pub fn seed_failed(&self) {
        bump(&self.seeds_failed);
    }

    pub fn member_page_fetched(&self) {
        bump(&self.member_pages_fetched);
    }

    pub fn member_page_failed(&self) {
        bump(&self.member_pages_failed);
    }

    pub fn leaderboard_page_fetched(&self) {
        bump(&self.leaderboard_pages_fetched);
    }

    pub fn leaderboard_page_failed(&self) {
        bump(&self.leaderboard_pages_failed);
    }

    /// Records the outcome of one `record_if_new` call
    pub fn handle_forwarded(&self, newly_recorded: bool) {
        bump(&self.handles_forwarded);
        if newly_recorded {
            bump(&self.handles_recorded);
        }
    }

    pub fn storage_error(&self) {
        bump(&self.storage_errors);
    }

    /// Freezes the counters into a summary
    pub fn summarize(&self, elapsed: Duration, peak_in_flight: usize) -> CrawlSummary {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        CrawlSummary {
            seeds_completed: load(&self.seeds_completed),
            seeds_failed: load(&self.seeds_failed),
            member_pages_fetched: load(&self.member_pages_fetched),
            member_pages_failed: load(&self.member_pages_failed),
            leaderboard_pages_fetched: load(&self.leaderboard_pages_fetched),
            leaderboard_pages_failed: load(&self.leaderboard_pages_failed),
            handles_forwarded: load(&self.handles_forwarded),
            handles_recorded: load(&self.handles_recorded),
            storage_errors: load(&self.storage_errors),
            peak_in_flight,
            elapsed,
        }
    }
}

/// Outcome of a finished crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub seeds_completed: u64,
    /// Seeds whose first members page could not be fetched
    pub seeds_failed: u64,
    pub member_pages_fetched: u64,
    pub member_pages_failed: u64,
    pub leaderboard_pages_fetched: u64,
    pub leaderboard_pages_failed: u64,
    /// Calls made to the sink, duplicates included
    pub handles_forwarded: u64,
    /// Handles that were new and durably appended
    pub handles_recorded: u64,
    pub storage_errors: u64,
    /// Highest number of fetches in flight at once
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Total fetch failures across all sources
    pub fn failed_fetches(&self) -> u64 {
        self.member_pages_failed + self.leaderboard_pages_failed
    }
}

/// Prints a crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Seed films:");
    println!("  Completed: {}", summary.seeds_completed);
    println!("  Failed on first page: {}", summary.seeds_failed);
    println!();

    println!("Pages:");
    println!(
        "  Members pages: {} fetched, {} failed",
        summary.member_pages_fetched, summary.member_pages_failed
    );
    println!(
        "  Leaderboard pages: {} fetched, {} failed",
        summary.leaderboard_pages_fetched, summary.leaderboard_pages_failed
    );
    println!("  Peak concurrent fetches: {}", summary.peak_in_flight);
    println!();

    println!("Handles:");
    println!("  Forwarded: {}", summary.handles_forwarded);
    println!("  Newly recorded: {}", summary.handles_recorded);
    if summary.storage_errors > 0 {
        println!("  Storage errors: {}", summary.storage_errors);
    }
    println!();

    println!("Completed in {:.2?}", summary.elapsed);
}

/// Prints how many handles a store holds
pub fn print_store_statistics(store: &dyn HandleStore) -> StorageResult<()> {
    println!("=== Handle Store ===\n");
    println!("Store: {}", store.describe());
    println!("Recorded handles: {}", store.count_handles()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_roll_into_summary() {
        let stats = CrawlStats::new();
        stats.seed_completed();
        stats.seed_failed();
        stats.member_page_fetched();
        stats.member_page_fetched();
        stats.member_page_failed();
        stats.leaderboard_page_failed();
        stats.handle_forwarded(true);
        stats.handle_forwarded(false);
        stats.storage_error();

        let summary = stats.summarize(Duration::from_secs(3), 4);

        assert_eq!(summary.seeds_completed, 1);
        assert_eq!(summary.seeds_failed, 1);
        assert_eq!(summary.member_pages_fetched, 2);
        assert_eq!(summary.handles_forwarded, 2);
        assert_eq!(summary.handles_recorded, 1);
        assert_eq!(summary.storage_errors, 1);
        assert_eq!(summary.failed_fetches(), 2);
        assert_eq!(summary.peak_in_flight, 4);
    }
}
