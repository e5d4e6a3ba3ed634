use super::SiteAdapter;
use crate::listing::{bracketed_number, child_text, element_text, parse_count, selector};
use scraper::{ElementRef, Html, Selector};
use trendscope_core::{
    CoreError, EngagementWeights, ListingKind, ParseError, PostRecord, RawCounters, SiteKind,
};

/// Replies plus recommendations.
const WEIGHTS: EngagementWeights = EngagementWeights::new(1.0, 0.0, 1.0, 0.0);

#[derive(Debug)]
pub struct DcInsideGallery {
    rows: Selector,
    title: Selector,
    replies: Selector,
    views: Selector,
    recommends: Selector,
    date: Selector,
}

impl DcInsideGallery {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            rows: selector(".gall_list tbody tr.ub-content")?,
            title: selector(".gall_tit a")?,
            replies: selector(".gall_tit .reply_num")?,
            views: selector(".gall_count")?,
            recommends: selector(".gall_recommend")?,
            date: selector(".gall_date")?,
        })
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Result<PostRecord, ParseError> {
        let title = row
            .select(&self.title)
            .next()
            .map(element_text)
            .filter(|title| !title.is_empty())
            .ok_or(ParseError::MissingTitle)?;

        let counters = RawCounters {
            comments: Some(
                child_text(row, &self.replies)
                    .and_then(|text| bracketed_number(&text))
                    .unwrap_or(0),
            ),
            views: Some(child_text(row, &self.views).map_or(0, |text| parse_count(&text))),
            recommends: Some(
                child_text(row, &self.recommends).map_or(0, |text| parse_count(&text)),
            ),
        };

        let post = PostRecord::scored(title, counters, &WEIGHTS);
        Ok(match child_text(row, &self.date) {
            Some(date) if !date.is_empty() => post.with_posted_at(date),
            _ => post,
        })
    }
}

impl SiteAdapter for DcInsideGallery {
    fn site(&self) -> SiteKind {
        SiteKind::DcInside
    }

    fn listing(&self) -> ListingKind {
        ListingKind::Board
    }

    fn page_urls(&self, board: &str, page: u32) -> Vec<String> {
        vec![format!(
            "{}/board/lists/?id={}&page={}",
            SiteKind::DcInside.base_url(),
            board,
            page
        )]
    }

    fn parse_listing(&self, html: &str) -> Vec<Result<PostRecord, ParseError>> {
        let document = Html::parse_document(html);
        document
            .select(&self.rows)
            .map(|row| self.parse_row(row))
            .collect()
    }
}
