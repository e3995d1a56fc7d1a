//! TMDB API request throttle.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Minimum-interval throttle shared by every request of one client.
///
/// TMDB enforces roughly 40 requests per second per IP.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Last request timestamp.
    last_request: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Returns how long the next request has to wait, measured at `now`.
    fn delay_at(&self, now: Instant) -> Duration {
        self.last_request.map_or(Duration::ZERO, |last| {
            self.min_interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Waits until the next request is allowed and returns the time slept.
    pub async fn wait(&mut self) -> Duration {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            tracing::trace!(delay_ms = delay.as_millis(), "TMDB request throttled");
            tokio::time::sleep(delay).await;
        }

        self.last_request = Some(Instant::now());
        delay
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_first_request_does_not_wait() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_secs(1));

        // Act
        let slept = limiter.wait().await;

        // Assert
        assert_eq!(slept, Duration::ZERO);
        assert!(limiter.last_request.is_some());
    }

    #[tokio::test]
    async fn test_second_request_waits_for_interval() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[test]
    fn test_delay_shrinks_with_elapsed_time() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(100));
        let last = Instant::now();
        limiter.last_request = Some(last);

        // Act
        let delay = limiter.delay_at(last + Duration::from_millis(40));
        let none_left = limiter.delay_at(last + Duration::from_millis(150));

        // Assert
        assert_eq!(delay, Duration::from_millis(60));
        assert_eq!(none_left, Duration::ZERO);
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let limiter = TmdbRateLimiter::default_interval();

        // Assert
        assert_eq!(limiter.min_interval, Duration::from_millis(25));
    }
}
