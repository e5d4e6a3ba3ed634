use super::SiteAdapter;
use crate::listing::{
    bracketed_number, child_text, element_text, parse_count, select_first, selector, selectors,
};
use scraper::{ElementRef, Html, Selector};
use trendscope_core::{
    CoreError, EngagementWeights, ListingKind, ParseError, PostRecord, RawCounters, SiteKind,
};

const PAGE_SIZE: u32 = 15;

/// Comments weigh 5, recommendations ("symph") weigh 10.
const WEIGHTS: EngagementWeights = EngagementWeights::new(5.0, 0.0, 10.0, 0.0);

/// A Clien board sorted by popularity (`od=T31`).
#[derive(Debug)]
pub struct ClienBoard {
    rows: Selector,
    fallback_rows: Selector,
    titles: Vec<Selector>,
    comments: Selector,
    hits: Selector,
    symphs: Selector,
}

impl ClienBoard {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            rows: selector(".list_item")?,
            fallback_rows: selector("div[class*=\"list\"]")?,
            titles: selectors(&[".subject_fixed", ".list_subject"])?,
            comments: selector(".comment_count")?,
            hits: selector(".hit")?,
            symphs: selector(".symph_count")?,
        })
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Result<PostRecord, ParseError> {
        let title = select_first(row, &self.titles)
            .map(element_text)
            .filter(|title| !title.is_empty())
            .ok_or(ParseError::MissingTitle)?;

        let counters = RawCounters {
            comments: Some(
                child_text(row, &self.comments)
                    .and_then(|text| bracketed_number(&text))
                    .unwrap_or(0),
            ),
            views: Some(child_text(row, &self.hits).map_or(0, |text| parse_count(&text))),
            recommends: Some(child_text(row, &self.symphs).map_or(0, |text| parse_count(&text))),
        };

        Ok(PostRecord::scored(title, counters, &WEIGHTS))
    }
}

impl SiteAdapter for ClienBoard {
    fn site(&self) -> SiteKind {
        SiteKind::Clien
    }

    fn listing(&self) -> ListingKind {
        ListingKind::Board
    }

    fn page_urls(&self, board: &str, page: u32) -> Vec<String> {
        let offset = page.saturating_sub(1) * PAGE_SIZE;
        vec![format!(
            "{}/service/board/{}?od=T31&po={}",
            SiteKind::Clien.base_url(),
            board,
            offset
        )]
    }

    fn parse_listing(&self, html: &str) -> Vec<Result<PostRecord, ParseError>> {
        let document = Html::parse_document(html);

        let mut rows: Vec<ElementRef<'_>> = document.select(&self.rows).collect();
        if rows.is_empty() {
            rows = document.select(&self.fallback_rows).collect();
        }

        rows.into_iter().map(|row| self.parse_row(row)).collect()
    }
}
