use crate::crawler::fetcher::{Document, FetchError, Fetcher};
use crate::crawler::limiter::Limiter;
use crate::output::CrawlStats;
use crate::storage::DedupSink;
use crate::url::{Handle, SiteUrls};
use url::Url;

/// Everything a crawl task needs, shared behind an `Arc`
pub struct CrawlContext {
    pub fetcher: Fetcher,
    pub limiter: Limiter,
    pub sink: DedupSink,
    pub urls: SiteUrls,
    pub stats: CrawlStats,
}

impl CrawlContext {
    /// Fetches a page and runs `extract` on it while holding a limiter permit
    ///
    /// The permit is released once extraction finishes, before the caller
    /// hands anything to the sink.
    pub async fn fetch_and_extract<T>(
        &self,
        url: &Url,
        extract: impl FnOnce(&Document) -> T,
    ) -> Result<T, FetchError> {
        let _permit = self.limiter.acquire().await;
        let document = self.fetcher.fetch(url).await?;
        Ok(extract(&document))
    }

    /// Hands one handle to the sink, logging storage failures
    ///
    /// Returns true when the handle was new.
    pub fn forward(&self, handle: &Handle) -> bool {
        match self.sink.record_if_new(handle) {
            Ok(newly_recorded) => {
                self.stats.handle_forwarded(newly_recorded);
                newly_recorded
            }
            Err(e) => {
                tracing::error!("Failed to record user '{}': {}", handle, e);
                self.stats.storage_error();
                false
            }
        }
    }
}
