//! Sliding-window rate limiting per client IP.
//!
//! Each client gets a deque of request timestamps; entries older than the
//! window are pruned on every check. Disabled entirely in development mode
//! for easier local testing.

use std::collections::VecDeque;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use crate::http::error::ApiError;
use crate::state::AppState;

/// Every this many checks, drop map entries whose last hit left the window.
const SWEEP_INTERVAL: u64 = 1024;

/// Sliding request-count window per client.
pub struct RateLimiter {
    hits: DashMap<IpAddr, VecDeque<Instant>>,
    window: Duration,
    max_requests: u32,
    enabled: bool,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32, enabled: bool) -> Self {
        Self {
            hits: DashMap::new(),
            window,
            max_requests,
            enabled,
            checks: AtomicU64::new(0),
        }
    }

    /// Record a request for `client` and return whether it is allowed.
    pub fn check(&self, client: IpAddr) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();

        // Idle clients never prune their own deque, so the map would grow
        // with each distinct IP seen; sweep them out periodically.
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.hits.retain(|_, hits| {
                hits.back()
                    .is_some_and(|&last| now.duration_since(last) < self.window)
            });
        }

        let mut entry = self.hits.entry(client).or_default();

        while let Some(&oldest) = entry.front() {
            if now.duration_since(oldest) >= self.window {
                entry.pop_front();
            } else {
                break;
            }
        }

        if entry.len() >= self.max_requests as usize {
            return false;
        }

        entry.push_back(now);
        true
    }
}

/// Axum middleware applying the rate limiter to every request.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if state.rate_limiter.check(addr.ip()) {
        next.run(request).await
    } else {
        ApiError {
            status: axum::http::StatusCode::TOO_MANY_REQUESTS,
            message: "Too many requests from this IP, please try again later.".to_string(),
        }
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IpAddr {
        "10.0.0.1".parse().unwrap()
    }

    #[test]
    fn test_allows_up_to_cap() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3, true);
        assert!(limiter.check(client()));
        assert!(limiter.check(client()));
        assert!(limiter.check(client()));
        assert!(!limiter.check(client()));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1, true);
        assert!(limiter.check("10.0.0.1".parse().unwrap()));
        assert!(limiter.check("10.0.0.2".parse().unwrap()));
        assert!(!limiter.check("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(Duration::from_millis(20), 1, true);
        assert!(limiter.check(client()));
        assert!(!limiter.check(client()));
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check(client()));
    }

    #[test]
    fn test_idle_clients_swept_from_map() {
        let limiter = RateLimiter::new(Duration::from_millis(20), 100, true);
        limiter.check("10.0.0.1".parse().unwrap());
        std::thread::sleep(Duration::from_millis(30));

        // Drive enough checks from a second client to cross a sweep boundary.
        let active: IpAddr = "10.0.0.2".parse().unwrap();
        for _ in 0..SWEEP_INTERVAL {
            limiter.check(active);
        }

        assert!(!limiter.hits.contains_key(&"10.0.0.1".parse::<IpAddr>().unwrap()));
        assert!(limiter.hits.contains_key(&active));
    }

    #[test]
    fn test_disabled_limiter_always_allows() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 0, false);
        for _ in 0..100 {
            assert!(limiter.check(client()));
        }
    }
}
