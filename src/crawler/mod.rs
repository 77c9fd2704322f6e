//! Crawler module for discovering member handles
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching without retries
//! - Markup extraction of member and leaderboard handles
//! - The process-wide concurrency limiter
//! - Members-listing pagination per seed film
//! - Overall crawl coordination

mod context;
mod coordinator;
mod fetcher;
mod leaderboard;
mod limiter;
mod pagination;
mod parser;

pub use context::CrawlContext;
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, Document, FetchError, Fetcher};
pub use leaderboard::run_leaderboard_page;
pub use limiter::{Limiter, LimiterPermit};
pub use pagination::{collect_seed_handles, run_seed};
pub use parser::{extract_members, extract_page_count, extract_popular, MemberPage};
