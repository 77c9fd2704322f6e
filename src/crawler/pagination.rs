//! Members-listing pagination for one seed film
//!
//! A pagination run fetches page 1 to learn how many pages the listing has,
//! then fetches pages 2..=N concurrently. Every fetch goes through the shared
//! limiter. Handles are deduplicated within the film before being forwarded
//! to the sink; deduplication across films is the sink's job.

use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::FetchError;
use crate::crawler::parser::{extract_members, MemberPage};
use crate::input::SeedItem;
use crate::url::Handle;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Crawls one seed film and forwards its unique handles to the sink
///
/// A failed first page abandons the film for this run. Failures on later
/// pages only lose the handles of those pages.
pub async fn run_seed(ctx: Arc<CrawlContext>, seed: SeedItem) {
    let handles = match collect_seed_handles(&ctx, &seed).await {
        Ok(handles) => handles,
        Err(e) => {
            tracing::error!("Failed to fetch first page for film '{}': {}", seed, e);
            ctx.stats.seed_failed();
            return;
        }
    };

    tracing::info!(
        "Found {} unique users from film '{}'",
        handles.len(),
        seed
    );

    let recorded = handles.iter().filter(|handle| ctx.forward(handle)).count();
    tracing::debug!("Film '{}' contributed {} new users", seed, recorded);

    ctx.stats.seed_completed();
}

/// Collects the unique handles of every page of a film's members listing
///
/// # Returns
///
/// * `Ok(HashSet<Handle>)` - Union of the handles of pages 1..=N
/// * `Err(FetchError)` - Page 1 could not be fetched
pub async fn collect_seed_handles(
    ctx: &Arc<CrawlContext>,
    seed: &SeedItem,
) -> Result<HashSet<Handle>, FetchError> {
    let url = ctx
        .urls
        .members_page(seed, 1)
        .map_err(|source| FetchError::InvalidUrl {
            url: format!("film/{}/members/", seed),
            source,
        })?;

    let first = ctx.fetch_and_extract(&url, MemberPage::parse).await?;
    ctx.stats.member_page_fetched();

    tracing::debug!(
        "Found {} users on page 1 of film '{}', {} pages in total",
        first.handles.len(),
        seed,
        first.page_count
    );

    let mut handles: HashSet<Handle> = first.handles.into_iter().collect();

    if first.page_count > 1 {
        let mut pages = JoinSet::new();
        for page in 2..=first.page_count {
            let ctx = Arc::clone(ctx);
            let seed = seed.clone();
            pages.spawn(async move { fetch_member_page(&ctx, &seed, page).await });
        }

        while let Some(result) = pages.join_next().await {
            match result {
                Ok(page_handles) => handles.extend(page_handles),
                Err(e) => tracing::error!("Page task for film '{}' did not finish: {}", seed, e),
            }
        }
    }

    Ok(handles)
}

/// Fetches one later page of a members listing
///
/// Failures are logged and yield no handles.
async fn fetch_member_page(ctx: &CrawlContext, seed: &SeedItem, page: u32) -> Vec<Handle> {
    let url = match ctx.urls.members_page(seed, page) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Cannot build URL for page {} of film '{}': {}", page, seed, e);
            ctx.stats.member_page_failed();
            return Vec::new();
        }
    };

    match ctx.fetch_and_extract(&url, extract_members).await {
        Ok(handles) => {
            ctx.stats.member_page_fetched();
            tracing::debug!(
                "Found {} users on page {} of film '{}'",
                handles.len(),
                page,
                seed
            );
            handles
        }
        Err(e) => {
            ctx.stats.member_page_failed();
            tracing::error!("Error fetching page {} for film '{}': {}", page, seed, e);
            Vec::new()
        }
    }
}
