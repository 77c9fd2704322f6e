//! Output module for reporting crawl results
//!
//! The crawl itself writes handles through the storage layer; this module
//! only reports on what happened.

mod stats;

pub use stats::{print_store_statistics, print_summary, CrawlStats, CrawlSummary};
