//! Shared request rate limiter.
//!
//! One instance is built per run and handed to the Crossref client behind an
//! `Arc`, so every concurrent lookup draws from the same budget.

use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Gcra};
use tokio_util::sync::CancellationToken;

use super::domain::LookupError;

/// Token bucket allowing `rate` requests per second with bursts of `burst`
pub struct RateLimiter {
    inner: Gcra<NotKeyed, InMemoryState, DefaultClock>,
}

impl RateLimiter {
    pub fn new(rate: NonZeroU32, burst: NonZeroU32) -> Self {
        let quota = Quota::per_second(rate).allow_burst(burst);
        Self {
            inner: Gcra::direct(quota),
        }
    }

    /// Wait for a permit.
    ///
    /// Fails with [`LookupError::Cancelled`] if the token is cancelled before a
    /// permit is granted. A cancelled token is checked first, so no permit is
    /// handed out once the run has been cancelled.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), LookupError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LookupError::Cancelled),
            _ = self.inner.until_ready() => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn limiter(rate: u32, burst: u32) -> RateLimiter {
        RateLimiter::new(
            NonZeroU32::new(rate).unwrap(),
            NonZeroU32::new(burst).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_burst_is_granted_immediately() {
        let limiter = limiter(1, 3);
        let cancel = CancellationToken::new();

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire(&cancel).await.unwrap();
        }
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_waits_once_burst_is_spent() {
        let limiter = limiter(10, 2);
        let cancel = CancellationToken::new();

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire(&cancel).await.unwrap();
        }
        // Third permit needs one replenish period (100ms at 10/s)
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_budget() {
        let limiter = Arc::new(limiter(20, 2));
        let cancel = CancellationToken::new();

        let start = Instant::now();
        let waits = (0..6).map(|_| {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.acquire(&cancel).await })
        });
        for result in futures::future::join_all(waits).await {
            result.unwrap().unwrap();
        }

        // 2 free permits, then 4 more at 50ms each
        assert!(start.elapsed() >= Duration::from_millis(180));
    }

    /// Most grants seen in any window of `window` starting at one of `grants`
    fn max_in_window(grants: &[Instant], window: Duration) -> usize {
        grants
            .iter()
            .map(|start| {
                grants
                    .iter()
                    .filter(|t| **t >= *start && t.duration_since(*start) < window)
                    .count()
            })
            .max()
            .unwrap_or(0)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_grants_per_window_stay_within_bucket_bound() {
        const RATE: u32 = 20;
        const BURST: u32 = 5;
        let limiter = Arc::new(limiter(RATE, BURST));
        let cancel = CancellationToken::new();

        let waits = (0..25).map(|_| {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                limiter.acquire(&cancel).await.map(|()| Instant::now())
            })
        });
        let mut grants: Vec<Instant> = futures::future::join_all(waits)
            .await
            .into_iter()
            .map(|result| result.unwrap().unwrap())
            .collect();
        grants.sort();

        // Shorter than BURST / RATE (250ms)
        let window = Duration::from_millis(200);
        let refills = (RATE as f64 * window.as_secs_f64()).ceil() as usize;

        // A full bucket plus the refills that land inside the window
        assert!(max_in_window(&grants, window) <= BURST as usize + refills);

        // Once the initial burst is spent, grants are paced at the sustained rate
        let paced = &grants[BURST as usize..];
        assert!(max_in_window(paced, window) <= BURST as usize);
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_waiting() {
        let limiter = limiter(1, 1);
        let cancel = CancellationToken::new();
        limiter.acquire(&cancel).await.unwrap();

        let waiter = {
            let cancel = cancel.clone();
            async move { limiter.acquire(&cancel).await }
        };
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        };

        let start = Instant::now();
        let (result, ()) = tokio::join!(waiter, canceller);
        assert_eq!(result, Err(LookupError::Cancelled));
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_no_permit_after_cancel() {
        let limiter = limiter(10, 10);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(limiter.acquire(&cancel).await, Err(LookupError::Cancelled));
    }
}
