//! Popular-members leaderboard pages
//!
//! Each leaderboard page is a self-contained unit: fetch, extract, forward.

use crate::crawler::context::CrawlContext;
use crate::crawler::parser::extract_popular;
use crate::input::LeaderboardPageRef;
use std::sync::Arc;

/// Fetches one leaderboard page and forwards its handles to the sink
pub async fn run_leaderboard_page(ctx: Arc<CrawlContext>, page_ref: LeaderboardPageRef) {
    let window = page_ref.window.path_segment();

    let url = match ctx.urls.leaderboard_page(&page_ref) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(
                "Cannot build URL for {} leaderboard page {}: {}",
                window,
                page_ref.page,
                e
            );
            ctx.stats.leaderboard_page_failed();
            return;
        }
    };

    let handles = match ctx.fetch_and_extract(&url, extract_popular).await {
        Ok(handles) => handles,
        Err(e) => {
            tracing::error!("Failed to fetch popular users from {}: {}", url, e);
            ctx.stats.leaderboard_page_failed();
            return;
        }
    };

    ctx.stats.leaderboard_page_fetched();
    tracing::debug!(
        "Found {} users on {} leaderboard page {}",
        handles.len(),
        window,
        page_ref.page
    );

    for handle in &handles {
        ctx.forward(handle);
    }
}
