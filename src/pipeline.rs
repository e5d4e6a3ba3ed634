use community_client::{
    collect_posts, BoardSource, HttpFetcher, PageFetcher, PostSource, RequestPacer, RetryConfig,
};
use keyword_engine::{ExtractorConfig, KeywordExtractor};
use std::sync::Arc;
use tracing::{info, warn};
use trend_report::{render_section, SourceReport, TrendDocument};
use trendscope_core::{AppConfig, BoardConfig, CoreError, ExtractionConfig, PostRecord};

/// Crawls every configured board and ranks each one's keywords.
pub struct TrendAnalyzer {
    config: AppConfig,
    fetcher: Arc<dyn PageFetcher>,
    page_pacer: RequestPacer,
    board_pacer: RequestPacer,
    retry: RetryConfig,
}

impl TrendAnalyzer {
    pub fn new(config: AppConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let page_pacer = RequestPacer::from_range(config.crawl.page_delay());
        let board_pacer = RequestPacer::from_range(config.crawl.board_delay());
        let retry = RetryConfig::for_crawl(&config.crawl);

        Self {
            config,
            fetcher,
            page_pacer,
            board_pacer,
            retry,
        }
    }

    pub fn over_http(config: AppConfig) -> Result<Self, CoreError> {
        let fetcher = HttpFetcher::new(&config.crawl)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn with_pacing(mut self, page_pacer: RequestPacer, board_pacer: RequestPacer) -> Self {
        self.page_pacer = page_pacer;
        self.board_pacer = board_pacer;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// `None` when the board yielded no posts at all.
    pub async fn analyze_board(
        &self,
        board: &BoardConfig,
    ) -> Result<Option<SourceReport>, CoreError> {
        let source = BoardSource::new(board.clone(), self.fetcher.clone(), self.retry.clone())?;
        let extractor =
            KeywordExtractor::new(ExtractorConfig::for_board(board, &self.config.extraction))?;

        let collected = collect_posts(&source, &self.page_pacer, board.max_items).await;
        if collected.posts.is_empty() {
            warn!("{}: no posts collected", source.source_name());
            return Ok(None);
        }

        let keywords = extractor.extract(&collected.posts, self.config.extraction.top_n);
        info!(
            "{}: {} keywords from {} posts",
            source.source_name(),
            keywords.len(),
            collected.posts.len()
        );

        Ok(Some(SourceReport::new(
            source.source_name(),
            collected.posts.len(),
            keywords,
        )))
    }

    /// Boards that yielded nothing are left out of the document.
    pub async fn run(&self) -> Result<TrendDocument, CoreError> {
        let mut document = TrendDocument::new();

        for (index, board) in self.config.boards.iter().enumerate() {
            if index > 0 {
                self.board_pacer.pause().await;
            }

            info!("Collecting {} ({})", board.display_name(), board.source_id());
            if let Some(report) = self.analyze_board(board).await? {
                print!(
                    "\n{}",
                    render_section(
                        &report.source_name,
                        &report.keywords,
                        self.config.extraction.display_top
                    )
                );
                document.insert(board.source_id(), report);
            }
        }

        Ok(document)
    }
}

/// Ranks already collected posts with the preset of `board`'s site.
pub fn analyze_posts(
    board: &BoardConfig,
    posts: &[PostRecord],
    extraction: &ExtractionConfig,
) -> Result<SourceReport, CoreError> {
    let extractor = KeywordExtractor::new(ExtractorConfig::for_board(board, extraction))?;
    let keywords = extractor.extract(posts, extraction.top_n);
    Ok(SourceReport::new(board.display_name(), posts.len(), keywords))
}
