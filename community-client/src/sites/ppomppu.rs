use super::SiteAdapter;
use crate::listing::{
    child_text, contains_any, element_text, first_number, parse_count, select_first, selector,
    selectors,
};
use scraper::{ElementRef, Html, Selector};
use trendscope_core::{
    CoreError, EngagementWeights, ListingKind, ParseError, PostRecord, RawCounters, SiteKind,
};

/// Views plus recommendations weighted by ten.
const WEIGHTS: EngagementWeights = EngagementWeights::new(0.0, 1.0, 10.0, 0.0);

const ENCODING: &str = "euc-kr";

const BOARD_NOTICE_WORDS: &[&str] = &["공지", "알림"];
const HOTDEAL_NOTICE_WORDS: &[&str] = &["공지", "알림", "광고", "이벤트", "안내"];

fn page_url(board: &str, page: u32) -> String {
    format!(
        "{}/zboard/zboard.php?id={}&page={}",
        SiteKind::Ppomppu.base_url(),
        board,
        page
    )
}

fn cell_count(row: ElementRef<'_>, cells: &[Selector]) -> u64 {
    select_first(row, cells).map_or(0, |cell| parse_count(&element_text(cell)))
}

fn notice_or(title: String, words: &[&str]) -> Result<String, ParseError> {
    if contains_any(&title, words) {
        Err(ParseError::ExcludedNotice { title })
    } else {
        Ok(title)
    }
}

/// A regular zboard listing.
#[derive(Debug)]
pub struct PpomppuBoard {
    rows: Selector,
    fallback_rows: Selector,
    titles: Vec<Selector>,
    hits: Vec<Selector>,
    recommends: Vec<Selector>,
}

impl PpomppuBoard {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            rows: selector("tr[class*=\"list\"]")?,
            fallback_rows: selector("table.board_table tr")?,
            titles: selectors(&[
                "a[class*=\"list_title\"]",
                "td.list_title a",
                "a.title",
                "td a",
            ])?,
            hits: selectors(&["td.hit", "td[class*=\"hit\"]"])?,
            recommends: selectors(&["td.recommend", "td[class*=\"rec\"]"])?,
        })
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Result<PostRecord, ParseError> {
        let title = select_first(row, &self.titles)
            .map(element_text)
            .filter(|title| !title.is_empty())
            .ok_or(ParseError::MissingTitle)?;
        let title = notice_or(title, BOARD_NOTICE_WORDS)?;

        let counters = RawCounters {
            views: Some(cell_count(row, &self.hits)),
            recommends: Some(cell_count(row, &self.recommends)),
            ..RawCounters::default()
        };

        Ok(PostRecord::scored(title, counters, &WEIGHTS))
    }
}

impl SiteAdapter for PpomppuBoard {
    fn site(&self) -> SiteKind {
        SiteKind::Ppomppu
    }

    fn listing(&self) -> ListingKind {
        ListingKind::Board
    }

    fn page_urls(&self, board: &str, page: u32) -> Vec<String> {
        vec![page_url(board, page)]
    }

    fn parse_listing(&self, html: &str) -> Vec<Result<PostRecord, ParseError>> {
        let document = Html::parse_document(html);

        let mut rows: Vec<ElementRef<'_>> = document.select(&self.rows).collect();
        if rows.is_empty() {
            rows = document.select(&self.fallback_rows).collect();
        }

        rows.into_iter().map(|row| self.parse_row(row)).collect()
    }

    fn fallback_encoding(&self) -> &'static str {
        ENCODING
    }
}

/// The hot deal table.
#[derive(Debug)]
pub struct PpomppuHotDeal {
    tables: Vec<Selector>,
    any_table: Selector,
    rows: Selector,
    spacer: Selector,
    title: Selector,
    views: Selector,
    recommends: Selector,
}

impl PpomppuHotDeal {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            tables: selectors(&[
                "table.board_list",
                "table.list_table",
                "table#revolution_main_table",
            ])?,
            any_table: selector("table")?,
            rows: selector("tr")?,
            spacer: selector("td.list_vspace")?,
            title: selector("a.baseList-title")?,
            views: selector("td.baseList-views")?,
            recommends: selector("td.baseList-rec")?,
        })
    }

    /// The known board table, else the table with the most markup.
    fn board_table<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.tables
            .iter()
            .find_map(|selector| document.select(selector).next())
            .or_else(|| {
                document
                    .select(&self.any_table)
                    .max_by_key(|table| table.html().len())
            })
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Result<PostRecord, ParseError> {
        let title = child_text(row, &self.title)
            .filter(|title| !title.is_empty())
            .ok_or(ParseError::MissingTitle)?;
        let title = notice_or(title, HOTDEAL_NOTICE_WORDS)?;

        // recommendation cell reads "up - down"
        let counters = RawCounters {
            views: Some(child_text(row, &self.views).map_or(0, |text| parse_count(&text))),
            recommends: Some(
                child_text(row, &self.recommends)
                    .and_then(|text| first_number(&text))
                    .unwrap_or(0),
            ),
            ..RawCounters::default()
        };

        Ok(PostRecord::scored(title, counters, &WEIGHTS))
    }
}

impl SiteAdapter for PpomppuHotDeal {
    fn site(&self) -> SiteKind {
        SiteKind::Ppomppu
    }

    fn listing(&self) -> ListingKind {
        ListingKind::HotDeal
    }

    fn page_urls(&self, board: &str, page: u32) -> Vec<String> {
        let board = if board.is_empty() { "ppomppu" } else { board };
        vec![page_url(board, page)]
    }

    fn parse_listing(&self, html: &str) -> Vec<Result<PostRecord, ParseError>> {
        let document = Html::parse_document(html);
        let Some(table) = self.board_table(&document) else {
            return Vec::new();
        };

        table
            .select(&self.rows)
            .filter(|row| row.select(&self.spacer).next().is_none())
            .map(|row| self.parse_row(row))
            .collect()
    }

    fn fallback_encoding(&self) -> &'static str {
        ENCODING
    }
}
