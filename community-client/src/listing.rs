use scraper::{ElementRef, Selector};
use tracing::debug;
use trendscope_core::{CoreError, ParseError, PostRecord};

/// Posts parsed from one listing page, with what was dropped along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub posts: Vec<PostRecord>,
    /// Rows without a usable title.
    pub skipped: usize,
    /// Notice, announcement and ad rows.
    pub excluded: usize,
}

impl ListingPage {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<PostRecord, ParseError>>,
    {
        let mut page = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(post) => page.posts.push(post),
                Err(ParseError::MissingTitle) => page.skipped += 1,
                Err(ParseError::ExcludedNotice { title }) => {
                    debug!("Excluded notice row: {}", title);
                    page.excluded += 1;
                }
            }
        }
        page
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector, CoreError> {
    Selector::parse(css).map_err(|e| CoreError::Internal {
        message: format!("invalid selector '{}': {}", css, e),
    })
}

pub(crate) fn selectors(css: &[&str]) -> Result<Vec<Selector>, CoreError> {
    css.iter().map(|css| selector(css)).collect()
}

/// Trimmed text content of an element and all its descendants.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First descendant matching any of `selectors`, tried in order.
pub(crate) fn select_first<'a>(
    element: ElementRef<'a>,
    selectors: &[Selector],
) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| element.select(selector).next())
}

/// Text of the first descendant matching `selector`.
pub(crate) fn child_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(element_text)
}

/// A counter cell only counts when it is all ASCII digits.
pub(crate) fn parse_count(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.parse().unwrap_or(0)
}

/// Number written as `[N]`, as boards print comment counts.
pub(crate) fn bracketed_number(text: &str) -> Option<u64> {
    text.match_indices('[').find_map(|(start, _)| {
        let rest = &text[start + 1..];
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 && rest[digits..].starts_with(']') {
            rest[..digits].parse().ok()
        } else {
            None
        }
    })
}

/// First run of ASCII digits anywhere in `text`.
pub(crate) fn first_number(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

pub(crate) fn contains_any(title: &str, words: &[&str]) -> bool {
    words.iter().any(|word| title.contains(word))
}
