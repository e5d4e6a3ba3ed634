use super::SiteAdapter;
use crate::listing::{child_text, element_text, first_number, select_first, selector, selectors};
use scraper::{ElementRef, Html, Selector};
use trendscope_core::{
    CoreError, EngagementWeights, ListingKind, ParseError, PostRecord, RawCounters, SiteKind,
};

const BOARD_WEIGHTS: EngagementWeights = EngagementWeights::new(1.0, 0.0, 0.0, 0.0);

/// Every chart entry is worth at least one.
const CHART_WEIGHTS: EngagementWeights = EngagementWeights::new(1.0, 0.0, 0.0, 1.0);

const CHART_PATHS: &[&str] = &["/pt", "/pt/0", "/name"];

/// Row markup has changed over time; the first selector that matches wins.
const CHART_ROWS: &[&str] = &[
    ".postBtn",
    ".post-list-item",
    "tr.tr",
    ".list-item",
    "a[class*=\"subject\"]",
    "td.subject",
    ".sbj",
];

const MIN_CHART_TITLE_CHARS: usize = 2;

#[derive(Debug)]
pub struct InstizBoard {
    rows: Selector,
    title: Selector,
    comments: Selector,
}

impl InstizBoard {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            rows: selector(".postBtn")?,
            title: selector(".title")?,
            comments: selector(".cmtnum")?,
        })
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Result<PostRecord, ParseError> {
        let title = child_text(row, &self.title)
            .filter(|title| !title.is_empty())
            .ok_or(ParseError::MissingTitle)?;

        let counters = RawCounters {
            comments: Some(
                child_text(row, &self.comments)
                    .and_then(|text| first_number(&text))
                    .unwrap_or(0),
            ),
            ..RawCounters::default()
        };

        Ok(PostRecord::scored(title, counters, &BOARD_WEIGHTS))
    }
}

impl SiteAdapter for InstizBoard {
    fn site(&self) -> SiteKind {
        SiteKind::Instiz
    }

    fn listing(&self) -> ListingKind {
        ListingKind::Board
    }

    fn page_urls(&self, board: &str, page: u32) -> Vec<String> {
        vec![format!(
            "{}/bbs/{}?page={}",
            SiteKind::Instiz.base_url(),
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

/// The realtime chart ("ichart"), a single unpaginated page.
#[derive(Debug)]
pub struct InstizChart {
    rows: Vec<Selector>,
    title: Selector,
    link: Selector,
    comments: Vec<Selector>,
}

impl InstizChart {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            rows: selectors(CHART_ROWS)?,
            title: selector(".title")?,
            link: selector("a")?,
            comments: selectors(&[".cmtnum", "[class*=\"cmt\"]"])?,
        })
    }

    /// `.title` text, else the first link's `title` attribute or text, else the row text.
    fn chart_title(&self, row: ElementRef<'_>) -> String {
        if let Some(title) = child_text(row, &self.title).filter(|t| !t.is_empty()) {
            return title;
        }

        if let Some(link) = row.select(&self.link).next() {
            let title = match link.value().attr("title") {
                Some(attr) if !attr.is_empty() => attr.trim().to_string(),
                _ => element_text(link),
            };
            if !title.is_empty() {
                return title;
            }
        }

        element_text(row)
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Result<PostRecord, ParseError> {
        let title = self.chart_title(row);
        if title.chars().count() < MIN_CHART_TITLE_CHARS {
            return Err(ParseError::MissingTitle);
        }

        let counters = RawCounters {
            comments: Some(
                select_first(row, &self.comments)
                    .and_then(|cell| first_number(&element_text(cell)))
                    .unwrap_or(0),
            ),
            ..RawCounters::default()
        };

        Ok(PostRecord::scored(title, counters, &CHART_WEIGHTS))
    }
}

impl SiteAdapter for InstizChart {
    fn site(&self) -> SiteKind {
        SiteKind::Instiz
    }

    fn listing(&self) -> ListingKind {
        ListingKind::Chart
    }

    fn page_urls(&self, _board: &str, _page: u32) -> Vec<String> {
        CHART_PATHS
            .iter()
            .map(|path| format!("{}{}", SiteKind::Instiz.base_url(), path))
            .collect()
    }

    fn parse_listing(&self, html: &str) -> Vec<Result<PostRecord, ParseError>> {
        let document = Html::parse_document(html);

        let Some(rows) = self
            .rows
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|rows| !rows.is_empty())
        else {
            return Vec::new();
        };

        rows.into_iter().map(|row| self.parse_row(row)).collect()
    }

    fn single_page(&self) -> bool {
        true
    }
}
