//! Request plumbing shared by every route: request IDs, bearer auth and a
//! global per-minute request budget. Rejections use the API error envelope.

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderMap, HeaderName, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use instascore_core::{AppConfig, Environment};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Client-supplied IDs longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token gate for the API routes.
#[derive(Debug, Clone)]
pub enum AuthState {
    /// No keys configured; every request is admitted.
    Open,
    Keys(Arc<HashSet<String>>),
}

impl AuthState {
    /// Auth from `INSTASCORE_API_KEYS`. Running without keys is only allowed
    /// in development.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let auth = Self::from_keys(config.api_keys.as_slice());
        if matches!(auth, Self::Open) {
            if config.env != Environment::Development {
                anyhow::bail!(
                    "INSTASCORE_API_KEYS is required in {} environment; provide comma-separated bearer tokens",
                    config.env
                );
            }
            tracing::warn!("INSTASCORE_API_KEYS not set; bearer auth disabled in development");
        }
        Ok(auth)
    }

    #[must_use]
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        let keys: HashSet<String> = keys
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if keys.is_empty() {
            Self::Open
        } else {
            Self::Keys(Arc::new(keys))
        }
    }

    fn admits(&self, headers: &HeaderMap) -> bool {
        match self {
            Self::Open => true,
            Self::Keys(keys) => bearer_token(headers).is_some_and(|token| keys.contains(token)),
        }
    }
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: u32,
}

/// Fixed-window request budget shared by all clients.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            current: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Spends one request from the window containing `now`. When the budget
    /// is spent, returns how long until the window reopens.
    async fn acquire(&self, now: Instant) -> Result<(), Duration> {
        let mut window = self.current.lock().await;
        let age = now.saturating_duration_since(window.opened_at);
        if age >= self.window {
            window.opened_at = now;
            window.used = 0;
        }

        if window.used >= self.limit {
            let age = now.saturating_duration_since(window.opened_at);
            return Err(self.window.saturating_sub(age));
        }
        window.used += 1;
        Ok(())
    }
}

fn reject(req: &Request, code: &str, message: &str) -> Response {
    let id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| Uuid::new_v4().to_string(), |r| r.0.clone());
    ApiError::new(id, code, message).into_response()
}

/// Reuses a sane incoming `x-request-id` or mints a UUID, exposes it to
/// handlers as [`RequestId`] and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if auth.admits(req.headers()) {
        next.run(req).await
    } else {
        reject(&req, "unauthorized", "missing or invalid bearer token")
    }
}

/// Answers 429 with `Retry-After` (whole seconds, at least 1) once the
/// window's budget is spent.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.acquire(Instant::now()).await {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let mut res = reject(&req, "rate_limited", "rate limit exceeded");
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs(wait)));
            res
        }
    }
}

fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(env: Environment, api_keys: &[&str]) -> AppConfig {
        AppConfig {
            database_url: None,
            env,
            bind_addr: "127.0.0.1:8000".parse().unwrap(),
            log_level: "info".to_string(),
            accounts_path: "./config/top_accounts.yaml".into(),
            db_max_connections: 10,
            db_min_connections: 1,
            db_acquire_timeout_secs: 10,
            scraper_base_url: "https://i.instagram.com".to_string(),
            scraper_request_timeout_secs: 30,
            scraper_user_agent: "ua".to_string(),
            scraper_app_id: "936619743392459".to_string(),
            scraper_session_id: None,
            scraper_max_attempts: 3,
            scraper_retry_backoff_base_ms: 1000,
            throttle_min_ms: 0,
            throttle_max_ms: 0,
            post_window: 12,
            leaderboard_size: 50,
            leaderboard_batch_size: 5,
            api_keys: api_keys.iter().map(ToString::to_string).collect(),
            rate_limit_per_minute: 120,
        }
    }

    #[test]
    fn auth_from_config_uses_configured_keys() {
        let auth = AuthState::from_config(&config(Environment::Production, &["k1"])).unwrap();
        assert!(auth.admits(&headers_with("Bearer k1")));
        assert!(!auth.admits(&HeaderMap::new()));
    }

    #[test]
    fn auth_without_keys_is_development_only() {
        let dev = AuthState::from_config(&config(Environment::Development, &[])).unwrap();
        assert!(matches!(dev, AuthState::Open));

        let err = AuthState::from_config(&config(Environment::Production, &[])).unwrap_err();
        assert!(err.to_string().contains("INSTASCORE_API_KEYS"));
        assert!(AuthState::from_config(&config(Environment::Test, &[])).is_err());
    }

    fn headers_with(auth: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(auth));
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer test-token")), Some("test-token"));
        assert_eq!(bearer_token(&headers_with("Basic abc123")), None);
        assert_eq!(bearer_token(&headers_with("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn empty_key_list_opens_auth() {
        let auth = AuthState::from_keys(&["", "  "]);
        assert!(matches!(auth, AuthState::Open));
        assert!(auth.admits(&HeaderMap::new()));
    }

    #[test]
    fn keys_are_trimmed_and_checked() {
        let auth = AuthState::from_keys(&[" alpha ", "beta"]);
        assert!(auth.admits(&headers_with("Bearer alpha")));
        assert!(auth.admits(&headers_with("Bearer beta")));
        assert!(!auth.admits(&headers_with("Bearer gamma")));
        assert!(!auth.admits(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn limiter_refuses_once_budget_is_spent() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));
        let now = Instant::now();
        assert!(limiter.acquire(now).await.is_ok());
        assert!(limiter.acquire(now).await.is_ok());

        let wait = limiter.acquire(now).await.unwrap_err();
        assert!(wait <= Duration::from_secs(10));
        assert!(wait > Duration::ZERO);
    }

    #[tokio::test]
    async fn limiter_reopens_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let now = Instant::now();
        assert!(limiter.acquire(now).await.is_ok());
        assert!(limiter.acquire(now).await.is_err());
        assert!(limiter
            .acquire(now + Duration::from_secs(11))
            .await
            .is_ok());
    }

    #[test]
    fn retry_after_rounds_up_to_whole_seconds() {
        assert_eq!(retry_after_secs(Duration::from_millis(1_500)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(3)), 3);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }
}
