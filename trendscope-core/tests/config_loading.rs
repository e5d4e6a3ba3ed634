use std::io::Write;
use std::time::Duration;
use trendscope_core::{AppConfig, ConfigError, ListingKind, SiteKind};

const SAMPLE: &str = r#"
[crawl]
page_delay_ms = [500, 800]

[extraction]
top_n = 50
extra_stopwords = ["후기"]

[[boards]]
site = "dcinside"
board = "book"
name = "도서 갤러리"
max_pages = 3

[[boards]]
site = "ppomppu"
board = "ppomppu"
listing = "hotdeal"

[[boards]]
site = "instiz"
listing = "chart"
max_pages = 1
max_items = 50
"#;

#[test]
fn test_sample_config_parses_with_defaults() {
    let config = AppConfig::from_toml_str(SAMPLE).unwrap();

    assert_eq!(config.boards.len(), 3);
    assert_eq!(
        config.crawl.page_delay(),
        (Duration::from_millis(500), Duration::from_millis(800))
    );
    assert_eq!(config.crawl.timeout_secs, 10);
    assert_eq!(config.crawl.max_attempts, 3);
    assert_eq!(config.extraction.top_n, 50);
    assert_eq!(config.extraction.overall_top_n, 20);
    assert_eq!(config.extraction.extra_stopwords, vec!["후기".to_string()]);

    let gallery = &config.boards[0];
    assert_eq!(gallery.site, SiteKind::DcInside);
    assert_eq!(gallery.listing, ListingKind::Board);
    assert_eq!(gallery.source_id(), "dcinside/book");
    assert_eq!(gallery.display_name(), "도서 갤러리");

    let hotdeal = &config.boards[1];
    assert_eq!(hotdeal.listing, ListingKind::HotDeal);
    assert_eq!(hotdeal.max_pages, 5);
    assert_eq!(hotdeal.display_name(), "뽐뿌 ppomppu");

    let chart = &config.boards[2];
    assert_eq!(chart.source_id(), "instiz/chart");
    assert_eq!(chart.max_items, Some(50));
}

#[test]
fn test_missing_boards_is_rejected() {
    let result = AppConfig::from_toml_str("[crawl]\ntimeout_secs = 5\n");
    assert!(matches!(result, Err(ConfigError::MissingField { field }) if field == "boards"));
}

#[test]
fn test_inverted_delay_range_is_rejected() {
    let text = r#"
[crawl]
page_delay_ms = [2000, 1000]

[[boards]]
site = "clien"
board = "park"
"#;
    let result = AppConfig::from_toml_str(text);
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_zero_pages_is_rejected() {
    let text = r#"
[[boards]]
site = "clien"
board = "park"
max_pages = 0
"#;
    let result = AppConfig::from_toml_str(text);
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_unknown_site_is_a_parse_error() {
    let text = r#"
[[boards]]
site = "naver"
board = "news"
"#;
    let result = AppConfig::from_toml_str(text);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.boards.len(), 3);
}

#[test]
fn test_load_missing_file() {
    let result = AppConfig::load("/definitely/not/here/trendscope.toml");
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}

#[test]
fn test_shipped_example_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../trendscope.example.toml");
    let config = AppConfig::load(path).unwrap();

    assert_eq!(config.boards.len(), 4);
    assert_eq!(config.boards[2].listing, ListingKind::Chart);
    assert_eq!(config.boards[2].source_id(), "instiz/chart");
    assert_eq!(config.boards[3].site, SiteKind::Ppomppu);
    assert_eq!(config.boards[3].listing, ListingKind::HotDeal);
}
