use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Post source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Operation timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Forbidden access to listing: {url}")]
    Forbidden { url: String },

    #[error("Listing page not found: {url}")]
    PageNotFound { url: String },

    #[error("Bot challenge served instead of listing: {url}")]
    BotChallenge { url: String },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid listing response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },

    #[error("Listing '{listing}' is not available on {site}")]
    UnsupportedListing { site: String, listing: String },
}

/// Outcome of one listing row that did not become a post.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Listing row has no title")]
    MissingTitle,

    #[error("Notice row excluded: {title}")]
    ExcludedNotice { title: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {details}")]
    InvalidFormat { details: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: the document has no sources")]
    EmptyDocument,

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}
