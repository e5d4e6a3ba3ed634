use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Random pause between consecutive requests to the same site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPacer {
    min: Duration,
    max: Duration,
}

impl RequestPacer {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_range((min, max): (Duration, Duration)) -> Self {
        Self::new(min, max)
    }

    /// A pacer that never waits.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Uniform draw from `[min, max]` at millisecond resolution.
    pub fn next_delay(&self) -> Duration {
        let low = self.min.as_millis() as u64;
        let high = self.max.as_millis() as u64;
        Duration::from_millis(fastrand::u64(low..=high))
    }

    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!("Pausing {:?} before the next request", delay);
        sleep(delay).await;
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(2))
    }
}
