//! Request pacing for a single scrape session
//!
//! One `RateLimiter` instance is owned per scrape session. Sharing an
//! instance across sessions throttles them jointly, which is only wanted
//! when several sessions hit the same origin.

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Enforces a minimum spacing between outbound requests
///
/// The limiter is not `Sync`: callers hold it behind `&mut`, which keeps
/// the read-modify-write of the last-call timestamp exclusive. Parallel
/// fetchers would need the timestamp behind a mutex to preserve the
/// one-call-per-interval guarantee globally.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter allowing at most `requests_per_minute` calls
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            min_interval: Duration::from_secs_f64(60.0 / requests_per_minute.max(1) as f64),
            last_request: None,
        }
    }

    /// Suspends the caller until the minimum interval since the previous
    /// call has elapsed
    ///
    /// The first call never sleeps. The last-call timestamp is updated on
    /// every invocation, including the first.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: sleeping for {:?}", delay);
                sleep(delay).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
