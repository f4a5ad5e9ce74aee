use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::AppState;

/// Login and registration attempts allowed per client per window.
pub const MAX_ATTEMPTS: u32 = 10;
pub const WINDOW: Duration = Duration::from_secs(60);

/// Fixed-window attempt counter keyed by client. Single-instance only.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_attempts: u32,
    window: Duration,
}

struct Window {
    attempts: u32,
    started: Instant,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// Record an attempt. `Ok(remaining)` when allowed, `Err(retry_after)`
    /// once the window is used up.
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> Result<u32, Duration> {
        let mut windows = self.windows.lock().await;
        let entry = windows.entry(key.to_string()).or_insert(Window {
            attempts: 0,
            started: now,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.attempts = 0;
            entry.started = now;
        }

        if entry.attempts >= self.max_attempts {
            return Err(self.window.saturating_sub(now.duration_since(entry.started)));
        }

        entry.attempts += 1;
        Ok(self.max_attempts - entry.attempts)
    }

    /// Drop windows that have been idle for two full periods.
    pub async fn prune(&self) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        let now = Instant::now();
        let keep_for = self.window * 2;
        windows.retain(|_, w| now.duration_since(w.started) < keep_for);
        before - windows.len()
    }

    pub fn spawn_pruner(&self) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.window * 5);
            loop {
                interval.tick().await;
                let pruned = limiter.prune().await;
                if pruned > 0 {
                    tracing::debug!(pruned, "Rate limiter: pruned idle windows");
                }
            }
        });
    }
}

/// Middleware for the login and registration routes, keyed by IP and path.
pub async fn limit_credentials(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = addr.ip().to_string();
    let path = req.uri().path().to_string();
    let key = format!("{}:{}", ip, path);

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(ip = %ip, path = %path, remaining, "Rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                ip = %ip,
                path = %path,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_limit_then_blocks() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert_eq!(limiter.check("ip:/api/login").await, Ok(2));
        assert_eq!(limiter.check("ip:/api/login").await, Ok(1));
        assert_eq!(limiter.check("ip:/api/login").await, Ok(0));
        assert!(limiter.check("ip:/api/login").await.is_err());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a").await.is_ok());
        assert!(limiter.check("a").await.is_err());
        assert!(limiter.check("b").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        assert!(limiter.check_at("a", start).await.is_ok());
        assert!(limiter.check_at("a", start + Duration::from_secs(30)).await.is_err());
        assert!(limiter.check_at("a", start + Duration::from_secs(61)).await.is_ok());
    }

    #[tokio::test]
    async fn test_retry_after_counts_down() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        let _ = limiter.check_at("a", start).await;
        let retry = limiter
            .check_at("a", start + Duration::from_secs(20))
            .await
            .unwrap_err();
        assert_eq!(retry, Duration::from_secs(40));
    }

    #[tokio::test]
    async fn test_prune_keeps_fresh_windows() {
        let limiter = RateLimiter::default();
        let _ = limiter.check("fresh").await;
        assert_eq!(limiter.prune().await, 0);
    }
}
