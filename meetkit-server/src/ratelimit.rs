//! Per-client rate limiting.
//!
//! Fixed-window counters keyed by client IP. The window resets `period`
//! after the first request that opened it, so a burst that exhausts the
//! budget stays blocked until the window rolls over.

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check.
#[derive(Debug, PartialEq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: u64 },
}

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by an opaque client string.
pub struct RateLimiter {
    limit: u32,
    period: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, period: Duration) -> Self {
        Self {
            limit,
            period,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Counts one request for `key` and decides whether it may proceed.
    pub fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();
        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.duration_since(window.started);
        if elapsed >= self.period {
            window.started = now;
            window.count = 0;
        }

        if window.count < self.limit {
            window.count += 1;
            return RateDecision::Allowed;
        }

        let remaining = self.period.saturating_sub(elapsed);
        let mut retry_after = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            retry_after += 1;
        }
        RateDecision::Limited {
            retry_after: retry_after.max(1),
        }
    }
}

/// Extracts the client key for rate limiting.
///
/// The first hop of `X-Forwarded-For` wins so deployments behind a proxy
/// see real client addresses. Falls back to the socket peer, then to a
/// shared "unknown" bucket.
fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
    {
        let first_hop = forwarded.trim();
        if !first_hop.is_empty() {
            return first_hop.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Axum middleware enforcing a [`RateLimiter`] on every request it wraps.
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    match limiter.check(&key) {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            tracing::warn!(client = %key, retry_after, "Rate limit exceeded");
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "success": false,
                    "error": "Rate limit exceeded",
                    "retry_after": retry_after,
                })),
            )
                .into_response();
            if let Ok(value) = retry_after.to_string().parse() {
                response
                    .headers_mut()
                    .insert(axum::http::header::RETRY_AFTER, value);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::per_minute(3);
        for _ in 0..3 {
            assert_eq!(limiter.check("10.0.0.1"), RateDecision::Allowed);
        }
        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Limited { .. }
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::per_minute(1);
        assert_eq!(limiter.check("10.0.0.1"), RateDecision::Allowed);
        assert_eq!(limiter.check("10.0.0.2"), RateDecision::Allowed);
        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Limited { .. }
        ));
    }

    #[test]
    fn test_window_rolls_over() {
        let limiter = RateLimiter::new(1, Duration::from_millis(30));
        assert_eq!(limiter.check("10.0.0.1"), RateDecision::Allowed);
        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Limited { .. }
        ));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(limiter.check("10.0.0.1"), RateDecision::Allowed);
    }

    #[test]
    fn test_retry_after_at_least_one_second() {
        let limiter = RateLimiter::per_minute(1);
        limiter.check("10.0.0.1");
        match limiter.check("10.0.0.1") {
            RateDecision::Limited { retry_after } => {
                assert!((1..=60).contains(&retry_after));
            }
            RateDecision::Allowed => panic!("expected limit"),
        }
    }
}
