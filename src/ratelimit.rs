//! Minimum-interval rate limiting for outbound API calls.
//!
//! A [`RateLimiter`] spaces consecutive calls of one operation so that each
//! starts at least `60 / max_per_minute` seconds after the previous one
//! completed. Callers share a limiter through an `Arc`; the last-completion
//! timestamp sits behind an async mutex held across wait, call and record,
//! so concurrent callers are serialized in lock order.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Spaces calls to one external operation.
#[derive(Debug)]
pub struct RateLimiter {
    name: &'static str,
    min_interval: Duration,
    last_completed: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing at most `max_per_minute` calls per minute.
    ///
    /// `0` disables spacing entirely.
    #[must_use]
    pub fn per_minute(name: &'static str, max_per_minute: u32) -> Self {
        let min_interval = if max_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(60) / max_per_minute
        };

        Self {
            name,
            min_interval,
            last_completed: Mutex::new(None),
        }
    }

    /// Name used in log output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Minimum spacing between the end of one call and the start of the next.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Run `op`, waiting first if the previous call completed too recently.
    ///
    /// The completion time is recorded whether `op` succeeds or fails.
    pub async fn run<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last_completed = self.last_completed.lock().await;

        if let Some(previous) = *last_completed {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(limiter = self.name, wait_ms = wait.as_millis(), "rate limit wait");
                tokio::time::sleep(wait).await;
            }
        }

        let output = op().await;
        *last_completed = Some(Instant::now());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_interval_from_rate() {
        assert_eq!(RateLimiter::per_minute("t", 60).min_interval(), Duration::from_secs(1));
        assert_eq!(RateLimiter::per_minute("t", 120).min_interval(), Duration::from_millis(500));
        assert_eq!(RateLimiter::per_minute("t", 0).min_interval(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_does_not_wait() {
        let limiter = RateLimiter::per_minute("t", 1);
        let start = Instant::now();
        limiter.run(|| async {}).await;
        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_spaced_after_first_completion() {
        let limiter = RateLimiter::per_minute("t", 60);

        let first_done = limiter
            .run(|| async {
                tokio::time::sleep(Duration::from_millis(250)).await;
                Instant::now()
            })
            .await;
        let second_start = limiter.run(|| async { Instant::now() }).await;

        assert!(second_start.duration_since(first_done) >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_when_interval_already_elapsed() {
        let limiter = RateLimiter::per_minute("t", 60);
        limiter.run(|| async {}).await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        let before = Instant::now();
        limiter.run(|| async {}).await;
        assert!(before.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_clock() {
        let limiter = Arc::new(RateLimiter::per_minute("t", 30));

        let a = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.run(|| async { Instant::now() }).await })
        };
        let b = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.run(|| async { Instant::now() }).await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let gap = if a > b { a - b } else { b - a };
        assert!(gap >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_call_still_records_completion() {
        let limiter = RateLimiter::per_minute("t", 60);
        let result: Result<(), &str> = limiter.run(|| async { Err("boom") }).await;
        assert!(result.is_err());

        let before = Instant::now();
        limiter.run(|| async {}).await;
        assert!(before.elapsed() >= Duration::from_secs(1));
    }
}
