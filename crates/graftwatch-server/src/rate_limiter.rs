use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// In-memory sliding window, one timestamp queue per client address.
/// Eviction, count and insert happen inside one critical section.
#[derive(Default)]
pub(crate) struct SlidingWindowLimiter {
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub(crate) async fn allow(&self, key: &str, cap: u32, window: Duration) -> bool {
        self.allow_at(key, cap, window, Instant::now()).await
    }

    pub(crate) async fn allow_at(
        &self,
        key: &str,
        cap: u32,
        window: Duration,
        now: Instant,
    ) -> bool {
        let mut lock = self.requests.lock().await;
        let bucket = lock.entry(key.to_string()).or_default();
        while let Some(oldest) = bucket.front() {
            if now.duration_since(*oldest) >= window {
                bucket.pop_front();
            } else {
                break;
            }
        }
        if bucket.len() >= cap as usize {
            return false;
        }
        bucket.push_back(now);
        true
    }

    #[cfg(test)]
    async fn pending(&self, key: &str) -> usize {
        self.requests
            .lock()
            .await
            .get(key)
            .map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn cap_is_enforced_per_key() {
        let limiter = SlidingWindowLimiter::default();
        let now = Instant::now();
        for _ in 0..60 {
            assert!(limiter.allow_at("10.0.0.1", 60, WINDOW, now).await);
        }
        assert!(!limiter.allow_at("10.0.0.1", 60, WINDOW, now).await);
        // A different client is unaffected.
        assert!(limiter.allow_at("10.0.0.2", 60, WINDOW, now).await);
    }

    #[tokio::test]
    async fn window_slides_and_eviction_is_monotone() {
        let limiter = SlidingWindowLimiter::default();
        let start = Instant::now();
        for _ in 0..60 {
            assert!(limiter.allow_at("ip", 60, WINDOW, start).await);
        }
        assert!(!limiter.allow_at("ip", 60, WINDOW, start).await);

        // One full window later the old timestamps are gone.
        let later = start + WINDOW;
        assert!(limiter.allow_at("ip", 60, WINDOW, later).await);
        assert_eq!(limiter.pending("ip").await, 1);
    }

    #[tokio::test]
    async fn partial_expiry_frees_exactly_the_old_slots() {
        let limiter = SlidingWindowLimiter::default();
        let start = Instant::now();
        for _ in 0..30 {
            assert!(limiter.allow_at("ip", 60, WINDOW, start).await);
        }
        let mid = start + Duration::from_secs(30);
        for _ in 0..30 {
            assert!(limiter.allow_at("ip", 60, WINDOW, mid).await);
        }
        assert!(!limiter.allow_at("ip", 60, WINDOW, mid).await);

        // The first half expires at start + window; the second half stays.
        let after = start + WINDOW;
        for _ in 0..30 {
            assert!(limiter.allow_at("ip", 60, WINDOW, after).await);
        }
        assert!(!limiter.allow_at("ip", 60, WINDOW, after).await);
        assert_eq!(limiter.pending("ip").await, 60);
    }
}
