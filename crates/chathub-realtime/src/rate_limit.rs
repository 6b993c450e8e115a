//! Token bucket gate for the publish path.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::RealtimeError;

/// Tolerance for float drift when a refill lands exactly on a whole token.
const TOKEN_EPSILON: f64 = 1e-9;

/// Process-wide token bucket: one token every `interval`, at most `burst`
/// tokens banked.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<TokenBucket>,
    burst: u32,
    interval: Duration,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a limiter that starts with a full bucket.
    pub fn new(interval: Duration, burst: u32) -> Self {
        Self {
            bucket: Mutex::new(TokenBucket {
                tokens: burst as f64,
                last_refill: Instant::now(),
            }),
            burst,
            interval,
        }
    }

    /// Burst capacity.
    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Refill interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn refill(&self, bucket: &mut TokenBucket, now: Instant) {
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        let earned = elapsed / self.interval.as_secs_f64();
        bucket.tokens = (bucket.tokens + earned).min(self.burst as f64);
        bucket.last_refill = now;
    }

    /// Attempts to take a token without waiting.
    pub async fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket, Instant::now());

        if bucket.tokens + TOKEN_EPSILON >= 1.0 {
            bucket.tokens = (bucket.tokens - 1.0).max(0.0);
            true
        } else {
            false
        }
    }

    /// Tokens currently banked (fractional while refilling).
    pub async fn available(&self) -> f64 {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket, Instant::now());
        bucket.tokens
    }

    /// Waits until a token is available and consumes it.
    ///
    /// Returns [`RealtimeError::Cancelled`] if `cancel` fires first; no token
    /// is consumed in that case.
    pub async fn wait(&self, cancel: &CancellationToken) -> Result<(), RealtimeError> {
        loop {
            if cancel.is_cancelled() {
                return Err(RealtimeError::Cancelled);
            }

            let delay = {
                let mut bucket = self.bucket.lock().await;
                self.refill(&mut bucket, Instant::now());

                if bucket.tokens + TOKEN_EPSILON >= 1.0 {
                    bucket.tokens = (bucket.tokens - 1.0).max(0.0);
                    return Ok(());
                }

                self.interval.mul_f64(1.0 - bucket.tokens)
            };

            tokio::select! {
                _ = cancel.cancelled() => return Err(RealtimeError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
