//! HTTP client for Instagram's private web API.

use std::time::Duration;

use async_trait::async_trait;
use instascore_core::{AppConfig, FetchError, ProfileSnapshot, ProfileSource};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::normalize::normalize_profile;
use crate::rate_limit::retry_with_backoff;
use crate::types::{FeedItem, InstagramUser, UserFeedResponse, WebProfileInfoResponse};

/// Maximum number of feed pages to walk for one profile. Guards against a
/// cursor that never advances.
pub(super) const MAX_PAGES: usize = 10;

/// Items requested per feed page.
pub(super) const FEED_PAGE_SIZE: usize = 12;

const APP_ID_HEADER: &str = "x-ig-app-id";
const LOGIN_PATH: &str = "/accounts/login";

/// Connection and retry settings for [`InstagramClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub app_id: String,
    pub session_id: Option<String>,
    /// Number of most recent posts to collect per profile.
    pub post_window: usize,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
}

impl ClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.scraper_base_url.clone(),
            timeout_secs: config.scraper_request_timeout_secs,
            user_agent: config.scraper_user_agent.clone(),
            app_id: config.scraper_app_id.clone(),
            session_id: config.scraper_session_id.clone(),
            post_window: config.post_window,
            max_attempts: config.scraper_max_attempts,
            backoff_base_ms: config.scraper_retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("app_id", &self.app_id)
            .field("session_id", &self.session_id.as_ref().map(|_| "[redacted]"))
            .field("post_window", &self.post_window)
            .field("max_attempts", &self.max_attempts)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

/// Fetches profile attributes and the recent-post window for a username.
///
/// A whole profile fetch (attributes plus every feed page) is one attempt;
/// transient failures restart it up to `max_attempts` times in total.
pub struct InstagramClient {
    client: Client,
    base_url: String,
    app_id: String,
    session_id: Option<String>,
    post_window: usize,
    max_attempts: u32,
    backoff_base_ms: u64,
}

impl InstagramClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ScraperError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            app_id: config.app_id,
            session_id: config.session_id,
            post_window: config.post_window,
            max_attempts: config.max_attempts,
            backoff_base_ms: config.backoff_base_ms,
        })
    }

    /// Fetches `username` with automatic retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::ProfileNotFound`]: HTTP 404 or a `null` user (not retried).
    /// - [`ScraperError::RateLimited`] / [`ScraperError::LoginRequired`]: after all attempts.
    /// - [`ScraperError::Deserialize`]: the body is not the expected JSON (not retried).
    /// - [`ScraperError::PaginationLimit`]: the feed cursor never ran out.
    pub async fn fetch_profile_snapshot(
        &self,
        username: &str,
    ) -> Result<ProfileSnapshot, ScraperError> {
        retry_with_backoff(self.max_attempts, self.backoff_base_ms, move || {
            self.fetch_once(username)
        })
        .await
    }

    async fn fetch_once(&self, username: &str) -> Result<ProfileSnapshot, ScraperError> {
        let user = self.fetch_user(username).await?;
        let items = self.fetch_recent_items(&user.id, username).await?;
        let snapshot = normalize_profile(user, items, self.post_window);
        tracing::debug!(
            username,
            followers = snapshot.follower_count,
            posts = snapshot.posts.len(),
            "fetched profile"
        );
        Ok(snapshot)
    }

    async fn fetch_user(&self, username: &str) -> Result<InstagramUser, ScraperError> {
        let url = Self::profile_info_url(&self.base_url, username)?;
        let response: WebProfileInfoResponse = self
            .get_json(&url, username, "web_profile_info")
            .await?;
        response
            .data
            .user
            .ok_or_else(|| ScraperError::ProfileNotFound {
                username: username.to_owned(),
            })
    }

    async fn fetch_recent_items(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<Vec<FeedItem>, ScraperError> {
        let mut items: Vec<FeedItem> = Vec::with_capacity(self.post_window);
        if self.post_window == 0 {
            return Ok(items);
        }

        let mut cursor: Option<String> = None;
        for _ in 0..MAX_PAGES {
            let count = (self.post_window - items.len()).min(FEED_PAGE_SIZE);
            let url = Self::feed_url(&self.base_url, user_id, count, cursor.as_deref())?;
            let page: UserFeedResponse = self.get_json(&url, username, "user feed").await?;

            let page_len = page.items.len();
            items.extend(page.items);
            if items.len() >= self.post_window || !page.more_available || page_len == 0 {
                return Ok(items);
            }

            match page.next_max_id {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => return Ok(items),
            }
        }

        Err(ScraperError::PaginationLimit {
            username: username.to_owned(),
            max_pages: MAX_PAGES,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        username: &str,
        context: &str,
    ) -> Result<T, ScraperError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(APP_ID_HEADER, &self.app_id);
        if let Some(session_id) = &self.session_id {
            request = request.header(reqwest::header::COOKIE, format!("sessionid={session_id}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited { retry_after_secs });
        }

        // Anonymous sessions get bounced to the login page instead of a 401.
        if status == StatusCode::UNAUTHORIZED || response.url().path().starts_with(LOGIN_PATH) {
            return Err(ScraperError::LoginRequired {
                url: response.url().to_string(),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ScraperError::ProfileNotFound {
                username: username.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("{context} for {username}"),
            source: e,
        })
    }

    fn endpoint(base_url: &str, path: &str) -> Result<Url, ScraperError> {
        Url::parse(&format!("{}/{path}", base_url.trim_end_matches('/'))).map_err(|e| {
            ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            }
        })
    }

    /// Builds the `web_profile_info` URL for `username`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if the base does not parse.
    fn profile_info_url(base_url: &str, username: &str) -> Result<String, ScraperError> {
        let mut url = Self::endpoint(base_url, "api/v1/users/web_profile_info/")?;
        url.query_pairs_mut().append_pair("username", username);
        Ok(url.to_string())
    }

    /// Builds one feed page URL, with `max_id` set when continuing from a cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if the base does not parse.
    fn feed_url(
        base_url: &str,
        user_id: &str,
        count: usize,
        max_id: Option<&str>,
    ) -> Result<String, ScraperError> {
        let mut url = Self::endpoint(base_url, &format!("api/v1/feed/user/{user_id}/"))?;
        url.query_pairs_mut()
            .append_pair("count", &count.to_string());
        if let Some(cursor) = max_id {
            url.query_pairs_mut().append_pair("max_id", cursor);
        }
        Ok(url.to_string())
    }
}

#[async_trait]
impl ProfileSource for InstagramClient {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileSnapshot, FetchError> {
        self.fetch_profile_snapshot(username)
            .await
            .map_err(FetchError::from)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
