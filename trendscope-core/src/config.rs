//! Application configuration loaded from TOML.
//!
//! Every section has defaults tuned for polite crawling, so a
//! config file only has to list the boards to visit.

use crate::error::ConfigError;
use crate::types::{ListingKind, SiteKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub boards: Vec<BoardConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Inclusive `[min, max]` pause between listing pages, in milliseconds.
    pub page_delay_ms: [u64; 2],
    /// Inclusive `[min, max]` pause between boards, in milliseconds.
    pub board_delay_ms: [u64; 2],
    pub max_attempts: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            page_delay_ms: [1000, 2000],
            board_delay_ms: [2000, 3000],
            max_attempts: 3,
        }
    }
}

impl CrawlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_delay(&self) -> (Duration, Duration) {
        to_durations(self.page_delay_ms)
    }

    pub fn board_delay(&self) -> (Duration, Duration) {
        to_durations(self.board_delay_ms)
    }
}

fn to_durations([min, max]: [u64; 2]) -> (Duration, Duration) {
    (Duration::from_millis(min), Duration::from_millis(max))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub top_n: usize,
    pub display_top: usize,
    pub overall_top_n: usize,
    /// Overrides the per-site minimum keyword length when set.
    pub min_length: Option<usize>,
    pub extra_stopwords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            top_n: 100,
            display_top: 10,
            overall_top_n: 20,
            min_length: None,
            extra_stopwords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("trends.json"),
            csv_path: PathBuf::from("trends.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub site: SiteKind,
    #[serde(default)]
    pub board: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub listing: ListingKind,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

fn default_max_pages() -> u32 {
    5
}

impl BoardConfig {
    pub fn new(site: SiteKind, board: impl Into<String>) -> Self {
        Self {
            site,
            board: board.into(),
            name: None,
            listing: ListingKind::Board,
            max_pages: default_max_pages(),
            max_items: None,
            extra_stopwords: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_listing(mut self, listing: ListingKind) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Key of this board in the structured report.
    pub fn source_id(&self) -> String {
        if self.board.is_empty() {
            format!("{}/{}", self.site, self.listing)
        } else {
            format!("{}/{}", self.site, self.board)
        }
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ if self.board.is_empty() => format!("{} {}", self.site.label(), self.listing),
            _ => format!("{} {}", self.site.label(), self.board),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::InvalidFormat {
                details: format!("{}: {}", path.display(), e),
            },
        })?;

        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded configuration from {} with {} boards",
            path.display(),
            config.boards.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boards.is_empty() {
            return Err(ConfigError::MissingField {
                field: "boards".to_string(),
            });
        }

        for board in &self.boards {
            if board.max_pages == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("boards[{}].max_pages", board.source_id()),
                    value: board.max_pages.to_string(),
                });
            }
            if board.listing == ListingKind::Board && board.board.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: format!("boards[{}].board", board.site),
                });
            }
        }

        check_range("crawl.page_delay_ms", self.crawl.page_delay_ms)?;
        check_range("crawl.board_delay_ms", self.crawl.board_delay_ms)?;

        if self.crawl.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawl.timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if self.crawl.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawl.max_attempts".to_string(),
                value: "0".to_string(),
            });
        }
        if self.extraction.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                field: "extraction.top_n".to_string(),
                value: "0".to_string(),
            });
        }
        if self.extraction.min_length == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "extraction.min_length".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}

fn check_range(field: &str, [min, max]: [u64; 2]) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::ValidationFailed {
            reason: format!("{} minimum {} exceeds maximum {}", field, min, max),
        });
    }
    Ok(())
}
