//! Per-backend call spacing.
//!
//! Each backend owns one slot holding the instant of its last call. The slot's
//! mutex is held across the wait, so concurrent callers of the same backend are
//! served one at a time, each at least `min_interval` after the previous one.
//! Backends never wait on each other.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::BackendKind;

pub struct RateLimiter {
    min_interval: Duration,
    slots: HashMap<BackendKind, Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        let slots = BackendKind::ALL
            .into_iter()
            .map(|kind| (kind, Mutex::new(None)))
            .collect();
        Self {
            min_interval,
            slots,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until `kind` may be called again, then records the call.
    pub async fn wait_turn(&self, kind: BackendKind) {
        let Some(slot) = self.slots.get(&kind) else {
            return;
        };
        let mut last_call = slot.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Rate limiting: sleeping {}ms for {kind}", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.wait_turn(BackendKind::OpenAi).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_calls_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.wait_turn(BackendKind::OpenAi).await;

        let start = Instant::now();
        limiter.wait_turn(BackendKind::OpenAi).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_remainder_is_waited() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.wait_turn(BackendKind::Anthropic).await;
        tokio::time::advance(Duration::from_millis(600)).await;

        let start = Instant::now();
        limiter.wait_turn(BackendKind::Anthropic).await;
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(400));
        assert!(waited < Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backends_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.wait_turn(BackendKind::OpenAi).await;

        let start = Instant::now();
        limiter.wait_turn(BackendKind::Anthropic).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.wait_turn(BackendKind::OpenAi).await;
        tokio::time::advance(Duration::from_secs(2)).await;

        let start = Instant::now();
        limiter.wait_turn(BackendKind::OpenAi).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
