use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};
use trendscope_core::{CoreError, CrawlConfig, SourceError};
use url::Url;

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Fetches the markup of one listing page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// `fallback_encoding` is used when the response declares no charset.
    async fn fetch(&self, url: &str, fallback_encoding: &str) -> Result<String, CoreError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, CoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, fallback_encoding: &str) -> Result<String, CoreError> {
        let parsed = Url::parse(url).map_err(|e| CoreError::InvalidInput {
            message: format!("invalid listing url '{}': {}", url, e),
        })?;

        debug!("GET {}", parsed);
        let response = self.client.get(parsed).send().await.map_err(request_error)?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());

        if let Some(error) = status_error(status, url, retry_after) {
            warn!("Request failed with status {} for {}", status, url);
            return Err(error.into());
        }

        let body = response
            .text_with_charset(fallback_encoding)
            .await
            .map_err(request_error)?;

        if looks_like_bot(&body) {
            return Err(SourceError::BotChallenge {
                url: url.to_string(),
            }
            .into());
        }

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn request_error(error: reqwest::Error) -> CoreError {
    if error.is_timeout() {
        SourceError::RequestTimeout.into()
    } else {
        CoreError::Network(error)
    }
}

/// Maps a non-success status to the matching source error.
pub fn status_error(
    status: StatusCode,
    url: &str,
    retry_after: Option<u64>,
) -> Option<SourceError> {
    if status.is_success() {
        return None;
    }

    let error = match status.as_u16() {
        429 => SourceError::RateLimitExceeded {
            retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        403 => SourceError::Forbidden {
            url: url.to_string(),
        },
        404 => SourceError::PageNotFound {
            url: url.to_string(),
        },
        code if status.is_server_error() => SourceError::ServerError { status_code: code },
        code => SourceError::InvalidResponse {
            details: format!("unexpected status {} from {}", code, url),
        },
    };
    Some(error)
}

/// Challenge interstitials served with a 200 status.
pub fn looks_like_bot(body: &str) -> bool {
    body.contains("Attention Required")
        || body.contains("Please wait while your request is being verified")
        || body.contains("cf-chl-")
}

/// Serves canned pages by URL. Unknown URLs answer `PageNotFound`.
#[derive(Debug, Default)]
pub struct FixturePageFetcher {
    pages: HashMap<String, Result<String, SourceError>>,
    requests: Mutex<Vec<String>>,
}

impl FixturePageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(html.into()));
        self
    }

    pub fn with_error(mut self, url: impl Into<String>, error: SourceError) -> Self {
        self.pages.insert(url.into(), Err(error));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl PageFetcher for FixturePageFetcher {
    async fn fetch(&self, url: &str, _fallback_encoding: &str) -> Result<String, CoreError> {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(url.to_string()),
            Err(poisoned) => poisoned.into_inner().push(url.to_string()),
        }

        match self.pages.get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(error)) => Err(error.clone().into()),
            None => Err(SourceError::PageNotFound {
                url: url.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let url = "https://www.clien.net/service/board/park";
        assert_eq!(status_error(StatusCode::OK, url, None), None);
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, url, Some(12)),
            Some(SourceError::RateLimitExceeded { retry_after: 12 })
        );
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, url, None),
            Some(SourceError::RateLimitExceeded { retry_after: 60 })
        );
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, url, None),
            Some(SourceError::Forbidden { .. })
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, url, None),
            Some(SourceError::PageNotFound { .. })
        ));
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY, url, None),
            Some(SourceError::ServerError { status_code: 502 })
        );
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, url, None),
            Some(SourceError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_bot_challenge_detection() {
        assert!(looks_like_bot(
            "<title>Attention Required! | Cloudflare</title>"
        ));
        assert!(looks_like_bot("<div id=\"cf-chl-widget\"></div>"));
        assert!(!looks_like_bot("<div class=\"list_item\">아이폰 리뷰</div>"));
    }

    #[test]
    fn test_http_fetcher_builds_from_config() {
        assert!(HttpFetcher::new(&CrawlConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fixture_fetcher_records_requests() {
        let fetcher = FixturePageFetcher::new()
            .with_page("https://a.test/1", "<p>one</p>")
            .with_error("https://a.test/2", SourceError::ServerError { status_code: 500 });

        assert_eq!(fetcher.fetch("https://a.test/1", "utf-8").await.unwrap(), "<p>one</p>");
        assert!(fetcher.fetch("https://a.test/2", "utf-8").await.is_err());
        assert!(matches!(
            fetcher.fetch("https://a.test/3", "utf-8").await,
            Err(CoreError::Source(SourceError::PageNotFound { .. }))
        ));
        assert_eq!(
            fetcher.requests(),
            vec!["https://a.test/1", "https://a.test/2", "https://a.test/3"]
        );
    }
}
