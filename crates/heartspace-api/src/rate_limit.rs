//! Token-bucket rate limiter middleware.
//!
//! The bucket holds up to `per_sec` permits and refills continuously at
//! `per_sec` permits per second. Applied to the unauthenticated account
//! routes, where each request costs an argon2 hash.

use std::sync::{Arc, Mutex};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::time::Instant;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Shared token bucket. Clones share the same bucket.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    per_sec: f64,
    bucket: Arc<Mutex<Bucket>>,
}

impl RateLimiter {
    pub fn new(per_sec: u32) -> Self {
        let per_sec = f64::from(per_sec.max(1));
        Self {
            per_sec,
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: per_sec,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Take one permit if available.
    pub fn try_acquire(&self) -> bool {
        let Ok(mut bucket) = self.bucket.lock() else {
            return false;
        };
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.per_sec).min(self.per_sec);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Axum middleware that rejects requests with 429 once the bucket is empty.
pub async fn limit_auth_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if state.auth_limiter.try_acquire() {
        next.run(req).await
    } else {
        warn!(path = %req.uri().path(), "Account request rate limited");
        ApiError::TooManyRequests("Too many requests, slow down".to_string()).into_response()
    }
}
