pub mod fetcher;
pub mod listing;
pub mod pacer;
pub mod retry;
pub mod sites;
pub mod source;


pub use fetcher::{FixturePageFetcher, HttpFetcher, PageFetcher};
pub use listing::ListingPage;
pub use pacer::RequestPacer;
pub use retry::{RetryConfig, RetryExecutor, RetryMetrics, RetryStrategy};
pub use sites::{adapter_for, SiteAdapter};
pub use source::{collect_posts, BoardSource, CollectedPosts, PostSource};
