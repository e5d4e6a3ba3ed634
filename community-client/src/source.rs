use crate::fetcher::PageFetcher;
use crate::listing::ListingPage;
use crate::pacer::RequestPacer;
use crate::retry::{RetryConfig, RetryExecutor, RetryMetrics};
use crate::sites::{adapter_for, SiteAdapter};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trendscope_core::{BoardConfig, CoreError, ErrorExt, PostRecord};

/// A paginated producer of post records.
#[async_trait]
pub trait PostSource: Send + Sync {
    fn source_id(&self) -> String;

    fn source_name(&self) -> String;

    /// Number of pages to visit.
    fn pages(&self) -> u32;

    async fn fetch_page(&self, page: u32) -> Result<ListingPage, CoreError>;

    /// Retry counters accumulated over the fetches so far.
    fn retry_metrics(&self) -> RetryMetrics {
        RetryMetrics::default()
    }
}

/// One configured board, fetched through a site adapter.
pub struct BoardSource {
    board: BoardConfig,
    adapter: Box<dyn SiteAdapter>,
    fetcher: Arc<dyn PageFetcher>,
    retry: RetryExecutor,
}

impl BoardSource {
    pub fn new(
        board: BoardConfig,
        fetcher: Arc<dyn PageFetcher>,
        retry: RetryConfig,
    ) -> Result<Self, CoreError> {
        let adapter = adapter_for(board.site, board.listing)?;
        Ok(Self {
            board,
            adapter,
            fetcher,
            retry: RetryExecutor::new(retry),
        })
    }

}

#[async_trait]
impl PostSource for BoardSource {
    fn source_id(&self) -> String {
        self.board.source_id()
    }

    fn source_name(&self) -> String {
        self.board.display_name()
    }

    fn pages(&self) -> u32 {
        if self.adapter.single_page() {
            1
        } else {
            self.board.max_pages
        }
    }

    fn retry_metrics(&self) -> RetryMetrics {
        self.retry.get_metrics()
    }

    async fn fetch_page(&self, page: u32) -> Result<ListingPage, CoreError> {
        let encoding = self.adapter.fallback_encoding();
        let urls = self.adapter.page_urls(&self.board.board, page);

        let mut empty_page = None;
        let mut last_error = None;

        for url in &urls {
            let html = match self
                .retry
                .execute(url, || self.fetcher.fetch(url, encoding))
                .await
            {
                Ok(html) => html,
                Err(error) => {
                    if urls.len() > 1 {
                        debug!("Candidate {} failed: {}", url, error);
                    }
                    last_error = Some(error);
                    continue;
                }
            };

            let listing = ListingPage::from_outcomes(self.adapter.parse_listing(&html));
            debug!(
                "{}: {} posts, {} skipped, {} excluded",
                url,
                listing.posts.len(),
                listing.skipped,
                listing.excluded
            );

            if !listing.is_empty() {
                return Ok(listing);
            }
            empty_page = Some(listing);
        }

        match (empty_page, last_error) {
            (Some(listing), _) => Ok(listing),
            (None, Some(error)) => Err(error),
            (None, None) => Ok(ListingPage::default()),
        }
    }
}

/// Everything gathered from one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedPosts {
    pub posts: Vec<PostRecord>,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub skipped_items: usize,
    pub excluded_items: usize,
    pub retries: RetryMetrics,
}

/// Visits the source's pages in order, pausing between them.
///
/// A failed page is logged and skipped, so the result may hold fewer posts
/// than requested or none at all. Collection stops once `max_items` posts
/// are gathered.
pub async fn collect_posts<S>(
    source: &S,
    pacer: &RequestPacer,
    max_items: Option<usize>,
) -> CollectedPosts
where
    S: PostSource + ?Sized,
{
    let mut collected = CollectedPosts::default();
    let pages = source.pages();
    let name = source.source_name();

    for page in 1..=pages {
        if page > 1 {
            pacer.pause().await;
        }

        match source.fetch_page(page).await {
            Ok(listing) => {
                collected.pages_fetched += 1;
                collected.skipped_items += listing.skipped;
                collected.excluded_items += listing.excluded;
                if listing.is_empty() {
                    warn!("{}: page {}/{} had no posts", name, page, pages);
                }
                collected.posts.extend(listing.posts);
                debug!(
                    "{}: page {}/{} done, {} posts so far",
                    name,
                    page,
                    pages,
                    collected.posts.len()
                );
            }
            Err(error) => {
                collected.pages_failed += 1;
                warn!(
                    "{}: page {}/{} failed [{}]: {}",
                    name,
                    page,
                    pages,
                    error.error_code(),
                    error
                );
            }
        }

        if let Some(max_items) = max_items {
            if collected.posts.len() >= max_items {
                collected.posts.truncate(max_items);
                break;
            }
        }
    }

    collected.retries = source.retry_metrics();
    info!(
        "{}: collected {} posts from {} pages ({} failed, {} rows skipped, {} retries, {}ms backoff)",
        name,
        collected.posts.len(),
        collected.pages_fetched,
        collected.pages_failed,
        collected.skipped_items,
        collected.retries.total_retries,
        collected.retries.total_delay_ms
    );
    collected
}
