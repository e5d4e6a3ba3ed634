use crate::error::*;
use std::time::Duration;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn retry_after(&self) -> Option<Duration>;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Source(e) => {
                error!("Post source error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            CoreError::Export(e) => {
                error!("Export error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Source(e) => e.is_retryable(),
            CoreError::Network(e) => e.is_timeout() || e.is_connect(),
            CoreError::Timeout { .. } => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::Source(e) => e.retry_after(),
            CoreError::Timeout { seconds } => Some(Duration::from_secs(*seconds)),
            _ if self.is_retryable() => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Source(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Export(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::Io(e) => format!("File operation failed: {}", e),
            CoreError::Serialization(_) => {
                "Could not read or write JSON data. Please check the file contents.".to_string()
            }
            CoreError::Csv(_) => "Could not write the CSV table.".to_string(),
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            CoreError::Timeout { .. } => {
                "The operation took too long to complete. Please try again.".to_string()
            }
            CoreError::Internal { .. } => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Source(_) => "SOURCE".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Export(_) => "EXPORT".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Csv(_) => "CSV".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Timeout { .. } => "TIMEOUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for SourceError {
    fn log_error(&self) -> &Self {
        error!("SourceError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("SourceError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            SourceError::RateLimitExceeded { .. } => true,
            SourceError::RequestTimeout => true,
            SourceError::ServerError { status_code } => *status_code >= 500,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            SourceError::RateLimitExceeded { retry_after } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ if self.is_retryable() => Some(Duration::from_secs(2)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            SourceError::RateLimitExceeded { retry_after } => format!(
                "The site is throttling requests. Please wait {} seconds before trying again.",
                retry_after
            ),
            SourceError::Forbidden { url } => {
                format!("Access to {} was refused by the site.", url)
            }
            SourceError::PageNotFound { url } => {
                format!("Listing page {} does not exist. Check the board id.", url)
            }
            SourceError::BotChallenge { .. } => {
                "The site answered with a bot check instead of the listing.".to_string()
            }
            SourceError::RequestTimeout => {
                "Request to the site timed out. Please try again.".to_string()
            }
            SourceError::UnsupportedListing { site, listing } => {
                format!("{} has no '{}' listing.", site, listing)
            }
            _ => "The site returned an unexpected response. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            SourceError::RateLimitExceeded { .. } => "SOURCE_RATE_LIMIT".to_string(),
            SourceError::Forbidden { .. } => "SOURCE_FORBIDDEN".to_string(),
            SourceError::PageNotFound { .. } => "SOURCE_PAGE_NOT_FOUND".to_string(),
            SourceError::BotChallenge { .. } => "SOURCE_BOT_CHALLENGE".to_string(),
            SourceError::RequestTimeout => "SOURCE_TIMEOUT".to_string(),
            SourceError::InvalidResponse { .. } => "SOURCE_INVALID_RESPONSE".to_string(),
            SourceError::ServerError { .. } => "SOURCE_SERVER_ERROR".to_string(),
            SourceError::UnsupportedListing { .. } => "SOURCE_UNSUPPORTED_LISTING".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidFormat { .. } | ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration is not usable: {}", reason)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidFormat { .. } => "CONFIG_INVALID_FORMAT".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ExportError {
    fn log_error(&self) -> &Self {
        error!("ExportError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ExportError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ExportError::EmptyDocument => {
                "No keywords were collected, nothing was saved.".to_string()
            }
            ExportError::WriteFailed { path, .. } => {
                format!("Could not save results to {}. Check the output path.", path)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ExportError::EmptyDocument => "EXPORT_EMPTY".to_string(),
            ExportError::WriteFailed { .. } => "EXPORT_WRITE_FAILED".to_string(),
        }
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
            if let Some(retry_after) = error.retry_after() {
                info!("Error is retryable. Retry after: {:?}", retry_after);
            }
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
