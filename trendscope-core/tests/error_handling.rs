use std::time::Duration;
use trendscope_core::{
    ConfigError, CoreError, ErrorExt, ErrorReporter, ExportError, SourceError,
};

#[test]
fn test_error_codes() {
    let source_error = CoreError::Source(SourceError::RequestTimeout);
    assert_eq!(source_error.error_code(), "SOURCE");

    let config_error = CoreError::Config(ConfigError::MissingField {
        field: "boards".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let export_error = CoreError::Export(ExportError::EmptyDocument);
    assert_eq!(export_error.error_code(), "EXPORT");

    assert_eq!(
        SourceError::BotChallenge {
            url: "https://gall.dcinside.com".to_string()
        }
        .error_code(),
        "SOURCE_BOT_CHALLENGE"
    );
}

#[test]
fn test_retryable_errors() {
    let throttled = CoreError::Source(SourceError::RateLimitExceeded { retry_after: 60 });
    assert!(throttled.is_retryable());

    let server = CoreError::Source(SourceError::ServerError { status_code: 503 });
    assert!(server.is_retryable());

    let missing = CoreError::Source(SourceError::PageNotFound {
        url: "https://www.clien.net/service/board/nope".to_string(),
    });
    assert!(!missing.is_retryable());

    let config = CoreError::Config(ConfigError::MissingField {
        field: "boards".to_string(),
    });
    assert!(!config.is_retryable());
}

#[test]
fn test_retry_after() {
    let throttled = CoreError::Source(SourceError::RateLimitExceeded { retry_after: 60 });
    assert_eq!(throttled.retry_after(), Some(Duration::from_secs(60)));

    let timeout = CoreError::Timeout { seconds: 30 };
    assert_eq!(timeout.retry_after(), Some(Duration::from_secs(30)));

    let forbidden = CoreError::Source(SourceError::Forbidden {
        url: "https://www.instiz.net/pt".to_string(),
    });
    assert_eq!(forbidden.retry_after(), None);
}

#[test]
fn test_user_friendly_messages() {
    let missing = CoreError::Source(SourceError::PageNotFound {
        url: "https://www.clien.net/service/board/nope".to_string(),
    });
    let message = missing.user_friendly_message();
    assert!(message.contains("Check the board id"));

    let config_error = CoreError::Config(ConfigError::MissingField {
        field: "boards".to_string(),
    });
    assert!(config_error.user_friendly_message().contains("boards"));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::Source(SourceError::RequestTimeout);

    // Only checks that reporting does not panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}
