//! Upstream request pacing.
//!
//! One pacer is shared per adapter instance, so the minimum inter-request
//! delay applies across every concurrent caller: batch fan-out and parallel
//! scans all funnel through the same gate, which is what keeps us under the
//! upstream rate limit.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive requests.
///
/// The internal lock is held across the sleep, so callers are admitted
/// strictly one at a time with at least `min_delay` between admissions.
pub struct RequestPacer {
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the next request is allowed, then claim the slot.
    pub async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_delay {
                tokio::time::sleep(self.min_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_secs(60));
        let start = Instant::now();
        pacer.pace().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_second_request_waits_min_delay() {
        let pacer = RequestPacer::new(Duration::from_millis(80));
        let start = Instant::now();
        pacer.pace().await;
        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_serialized() {
        use std::sync::Arc;

        let pacer = Arc::new(RequestPacer::new(Duration::from_millis(50)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let pacer = pacer.clone();
            handles.push(tokio::spawn(async move { pacer.pace().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Three admissions need at least two full delays between them.
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
