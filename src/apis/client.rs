/// Base HTTP client and the shared token-bucket rate limiter
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

// ============================================================================
// TOKEN BUCKET RATE LIMITER
// ============================================================================

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket admitting at most `max_requests` calls per `per_seconds`
///
/// Every HTTP call acquires exactly one unit, so the budget counts real
/// requests rather than classified wallets. The bucket starts full.
pub struct RateLimiter {
    state: Mutex<BucketState>,
    capacity: f64,
    refill_per_sec: f64,
    window: SlidingWindowTracker,
    total: AtomicU64,
}

impl RateLimiter {
    pub fn new(max_requests: u32, per_seconds: u64) -> Self {
        let capacity = max_requests.max(1) as f64;
        let per_seconds = per_seconds.max(1);

        Self {
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
            capacity,
            refill_per_sec: capacity / per_seconds as f64,
            window: SlidingWindowTracker::new(
                Duration::from_secs(per_seconds),
                max_requests as usize,
            ),
            total: AtomicU64::new(0),
        }
    }

    /// Wait until one unit is available and take it
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
                state.last_refill = now;

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    None
                } else {
                    let missing = 1.0 - state.tokens;
                    Some(Duration::from_secs_f64(missing / self.refill_per_sec))
                }
            };

            match wait {
                None => break,
                Some(duration) => tokio::time::sleep(duration).await,
            }
        }

        self.window.record();
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Units handed out since creation
    pub fn total_acquired(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Units handed out within the last refill window
    pub fn recent_count(&self) -> usize {
        self.window.count()
    }
}

// ============================================================================
// SLIDING WINDOW TRACKER
// ============================================================================

/// Sliding window request counter used for reporting
pub struct SlidingWindowTracker {
    window_size: Duration,
    timestamps: StdMutex<Vec<Instant>>,
    capacity: usize,
}

impl SlidingWindowTracker {
    pub fn new(window_size: Duration, capacity: usize) -> Self {
        Self {
            window_size,
            timestamps: StdMutex::new(Vec::with_capacity(capacity.min(4096))),
            capacity: capacity.max(1),
        }
    }

    /// Record a request
    pub fn record(&self) {
        let now = Instant::now();
        if let Ok(mut timestamps) = self.timestamps.lock() {
            if let Some(cutoff) = now.checked_sub(self.window_size) {
                timestamps.retain(|t| *t > cutoff);
            }
            if timestamps.len() < self.capacity {
                timestamps.push(now);
            }
        }
    }

    /// Get count in current window
    pub fn count(&self) -> usize {
        let now = Instant::now();
        let Ok(timestamps) = self.timestamps.lock() else {
            return 0;
        };
        match now.checked_sub(self.window_size) {
            Some(cutoff) => timestamps.iter().filter(|t| **t > cutoff).count(),
            None => timestamps.len(),
        }
    }
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

/// HTTP client wrapper with timeout and JSON decoding
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request and decode a JSON body
    ///
    /// When a limiter is given one unit is taken before the request is sent.
    /// Status 429 maps to `ApiError::RateLimited`, other non-success statuses
    /// to `ApiError::HttpStatus`.
    pub async fn get_json<T>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
        limiter: Option<&RateLimiter>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        if let Some(limiter) = limiter {
            limiter.acquire().await;
        }

        let start = std::time::Instant::now();
        let response = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                endpoint: endpoint.to_string(),
                error: e.to_string(),
            })?;

        let status = response.status();
        logger::verbose(
            LogTag::Api,
            &format!(
                "{} -> {} in {}ms",
                endpoint,
                status.as_u16(),
                start.elapsed().as_millis()
            ),
        );

        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(ApiError::from_status(endpoint, status.as_u16(), body));
        }

        let bytes = response.bytes().await.map_err(|e| ApiError::Request {
            endpoint: endpoint.to_string(),
            error: e.to_string(),
        })?;

        serde_json::from_slice::<T>(&bytes).map_err(|e| ApiError::Malformed {
            endpoint: endpoint.to_string(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_limiter_throttles_to_rate() {
        // 1 request per 2 seconds, three units
        let limiter = RateLimiter::new(1, 2);
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() >= Duration::from_secs(4));
        assert_eq!(limiter.total_acquired(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_burst_within_capacity_is_immediate() {
        let limiter = RateLimiter::new(5, 60);
        let start = Instant::now();

        for _ in 0..5 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(1));
        assert_eq!(limiter.recent_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_forgets_old_entries() {
        let tracker = SlidingWindowTracker::new(Duration::from_secs(10), 100);
        tracker.record();
        tracker.record();
        assert_eq!(tracker.count(), 2);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(tracker.count(), 0);
    }
}
