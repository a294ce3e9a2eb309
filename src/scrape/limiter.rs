//! Minimum-interval rate limiting for outbound requests

use std::time::{Duration, Instant};

/// Enforces a minimum interval between outbound requests
///
/// The limiter holds a single "last call" timestamp. `wait` must be called
/// exactly once per outbound request, including page-2+ pagination fetches
/// within the same topic. The interval guarantee is measured from the moment
/// the previous `wait` returned.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_call: None,
        }
    }

    /// Blocks until at least `delay` has elapsed since the previous call returned
    ///
    /// The first call returns immediately.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
