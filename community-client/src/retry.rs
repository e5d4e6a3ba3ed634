use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use trendscope_core::{CoreError, CrawlConfig, SourceError};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts per operation, the first one included
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Backoff tuned for listing pages of community boards.
    pub fn for_crawl(crawl: &CrawlConfig) -> Self {
        Self {
            max_attempts: crawl.max_attempts,
            base_delay_ms: 1500,
            max_delay_ms: 15000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }

    /// Single attempt, no sleeping. Used for fixtures.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Retry with exponential backoff
    Retry,
    /// Retry after the delay the site asked for
    RetryWithDelay(Duration),
    /// Don't retry (for permanent failures)
    NoRetry,
}

pub fn get_retry_strategy(error: &CoreError) -> RetryStrategy {
    match error {
        CoreError::Source(source_error) => match source_error {
            SourceError::RateLimitExceeded { retry_after } => {
                RetryStrategy::RetryWithDelay(Duration::from_secs(*retry_after))
            }
            SourceError::ServerError { .. } => RetryStrategy::Retry,
            SourceError::RequestTimeout => RetryStrategy::Retry,
            // a challenge page will not go away by asking again
            SourceError::BotChallenge { .. } => RetryStrategy::NoRetry,
            SourceError::Forbidden { .. } => RetryStrategy::NoRetry,
            SourceError::PageNotFound { .. } => RetryStrategy::NoRetry,
            SourceError::InvalidResponse { .. } => RetryStrategy::NoRetry,
            SourceError::UnsupportedListing { .. } => RetryStrategy::NoRetry,
        },
        CoreError::Network(reqwest_error) => {
            if reqwest_error.is_timeout() || reqwest_error.is_connect() {
                RetryStrategy::Retry
            } else {
                RetryStrategy::NoRetry
            }
        }
        CoreError::Timeout { .. } => RetryStrategy::Retry,
        _ => RetryStrategy::NoRetry,
    }
}

/// Calculate delay with exponential backoff and jitter
pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let max_delay = Duration::from_millis(config.max_delay_ms);

    let multiplier = config.backoff_multiplier.powi(attempt as i32);
    let delay_ms = ((config.base_delay_ms as f64 * multiplier) as u64).min(config.max_delay_ms);
    let exponential_delay = Duration::from_millis(delay_ms);

    let jitter_range = (delay_ms as f64 * config.jitter_factor) as u64;
    let jitter = fastrand::u64(0..=jitter_range);

    (exponential_delay + Duration::from_millis(jitter)).min(max_delay)
}

/// Snapshot of the executor counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryMetrics {
    pub total_retries: u64,
    pub successful_retries: u64,
    pub failed_operations: u64,
    pub total_delay_ms: u64,
}

#[derive(Debug, Default)]
struct MetricCounters {
    total_retries: AtomicU64,
    successful_retries: AtomicU64,
    failed_operations: AtomicU64,
    total_delay_ms: AtomicU64,
}

/// Wraps fallible async operations with retry logic
#[derive(Debug)]
pub struct RetryExecutor {
    config: RetryConfig,
    metrics: MetricCounters,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            metrics: MetricCounters::default(),
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation` until it succeeds, fails permanently or runs out of attempts.
    ///
    /// The error of the last attempt is returned unchanged.
    pub async fn execute<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let max_delay = Duration::from_millis(self.config.max_delay_ms);
        let mut total_delay_ms = 0u64;
        let mut attempt = 0u32;

        loop {
            if attempt > 0 {
                debug!("Retry attempt {} for {}", attempt, operation_name);
            }

            let start_time = Instant::now();
            let error = match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        self.metrics
                            .total_retries
                            .fetch_add(attempt as u64, Ordering::Relaxed);
                        self.metrics
                            .successful_retries
                            .fetch_add(1, Ordering::Relaxed);
                        self.metrics
                            .total_delay_ms
                            .fetch_add(total_delay_ms, Ordering::Relaxed);

                        info!(
                            "{} succeeded after {} retries (total delay: {}ms)",
                            operation_name, attempt, total_delay_ms
                        );
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            debug!(
                "Attempt {} failed for {} after {:?}: {}",
                attempt + 1,
                operation_name,
                start_time.elapsed(),
                error
            );

            let has_attempts_left = attempt + 1 < max_attempts;
            let delay = match get_retry_strategy(&error) {
                RetryStrategy::Retry if has_attempts_left => calculate_delay(attempt, &self.config),
                RetryStrategy::RetryWithDelay(delay) if has_attempts_left => delay.min(max_delay),
                RetryStrategy::NoRetry => {
                    debug!("Not retrying {}: {}", operation_name, error);
                    return Err(self.give_up(operation_name, attempt, total_delay_ms, error));
                }
                _ => return Err(self.give_up(operation_name, attempt, total_delay_ms, error)),
            };

            info!("Retrying {} in {:?} due to: {}", operation_name, delay, error);
            total_delay_ms += delay.as_millis() as u64;
            sleep(delay).await;
            attempt += 1;
        }
    }

    fn give_up(
        &self,
        operation_name: &str,
        attempt: u32,
        total_delay_ms: u64,
        error: CoreError,
    ) -> CoreError {
        self.metrics
            .total_retries
            .fetch_add(attempt as u64, Ordering::Relaxed);
        self.metrics
            .failed_operations
            .fetch_add(1, Ordering::Relaxed);
        self.metrics
            .total_delay_ms
            .fetch_add(total_delay_ms, Ordering::Relaxed);

        warn!(
            "{} failed after {} attempts (total delay: {}ms): {}",
            operation_name,
            attempt + 1,
            total_delay_ms,
            error
        );
        error
    }

    pub fn get_metrics(&self) -> RetryMetrics {
        RetryMetrics {
            total_retries: self.metrics.total_retries.load(Ordering::Relaxed),
            successful_retries: self.metrics.successful_retries.load(Ordering::Relaxed),
            failed_operations: self.metrics.failed_operations.load(Ordering::Relaxed),
            total_delay_ms: self.metrics.total_delay_ms.load(Ordering::Relaxed),
        }
    }
}
