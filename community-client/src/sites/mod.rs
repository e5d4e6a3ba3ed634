//! Per-site listing adapters.
//!
//! An adapter knows where a site's listing pages live, how to turn one page
//! of markup into post records and how the site's counters combine into an
//! engagement score. Fetching and pacing are left to [`crate::BoardSource`].

mod clien;
mod dcinside;
mod instiz;
mod ppomppu;

pub use clien::ClienBoard;
pub use dcinside::DcInsideGallery;
pub use instiz::{InstizBoard, InstizChart};
pub use ppomppu::{PpomppuBoard, PpomppuHotDeal};

use trendscope_core::{
    CoreError, ListingKind, ParseError, PostRecord, SiteKind, SourceError,
};

pub trait SiteAdapter: Send + Sync {
    fn site(&self) -> SiteKind;

    fn listing(&self) -> ListingKind;

    /// Candidate URLs for one 1-based page, tried in order until one yields posts.
    fn page_urls(&self, board: &str, page: u32) -> Vec<String>;

    /// One outcome per listing row, in page order.
    fn parse_listing(&self, html: &str) -> Vec<Result<PostRecord, ParseError>>;

    /// Charset used when the response does not declare one.
    fn fallback_encoding(&self) -> &'static str {
        "utf-8"
    }

    /// Listings that have no pagination.
    fn single_page(&self) -> bool {
        false
    }
}

pub fn adapter_for(
    site: SiteKind,
    listing: ListingKind,
) -> Result<Box<dyn SiteAdapter>, CoreError> {
    let adapter: Box<dyn SiteAdapter> = match (site, listing) {
        (SiteKind::Clien, ListingKind::Board) => Box::new(ClienBoard::new()?),
        (SiteKind::DcInside, ListingKind::Board) => Box::new(DcInsideGallery::new()?),
        (SiteKind::Instiz, ListingKind::Board) => Box::new(InstizBoard::new()?),
        (SiteKind::Instiz, ListingKind::Chart) => Box::new(InstizChart::new()?),
        (SiteKind::Ppomppu, ListingKind::Board) => Box::new(PpomppuBoard::new()?),
        (SiteKind::Ppomppu, ListingKind::HotDeal) => Box::new(PpomppuHotDeal::new()?),
        _ => {
            return Err(SourceError::UnsupportedListing {
                site: site.to_string(),
                listing: listing.to_string(),
            }
            .into())
        }
    };
    Ok(adapter)
}
