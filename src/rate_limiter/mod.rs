use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Keeps a minimum interval between consecutive requests of a shared transport
pub struct RateLimiter {
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_request: Mutex::new(None),
        }
    }

    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }

        // held across the sleep so concurrent callers queue up
        let mut last_request = self.last_request.lock().await;
        if let Some(remaining) = self.remaining(*last_request) {
            sleep(remaining).await;
        }
        *last_request = Some(Instant::now());
    }

    fn remaining(&self, last_request: Option<Instant>) -> Option<Duration> {
        let elapsed = last_request?.elapsed();
        self.delay.checked_sub(elapsed).filter(|d| !d.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_not_delayed() {
        let limiter = RateLimiter::new(200);
        let started = Instant::now();

        limiter.wait().await;

        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let limiter = RateLimiter::new(50);
        let started = Instant::now();

        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_zero_delay_never_waits() {
        let limiter = RateLimiter::new(0);
        let started = Instant::now();

        for _ in 0..100 {
            limiter.wait().await;
        }

        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
