use instascore_core::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Instagram (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("login required to read {url}")]
    LoginRequired { url: String },

    #[error("profile not found: {username}")]
    ProfileNotFound { username: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("normalization error for post {shortcode}: {reason}")]
    Normalization { shortcode: String, reason: String },

    #[error("pagination limit reached for {username}: exceeded {max_pages} pages")]
    PaginationLimit { username: String, max_pages: usize },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ScraperError {
    /// Whether the failure is likely to clear up on a later attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ScraperError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            ScraperError::RateLimited { .. } | ScraperError::LoginRequired { .. } => true,
            ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
            ScraperError::Deserialize { .. }
            | ScraperError::ProfileNotFound { .. }
            | ScraperError::Normalization { .. }
            | ScraperError::PaginationLimit { .. }
            | ScraperError::InvalidBaseUrl { .. } => false,
        }
    }
}

impl From<ScraperError> for FetchError {
    fn from(err: ScraperError) -> Self {
        match err {
            ScraperError::ProfileNotFound { username } => FetchError::NotFound(username),
            other if other.is_transient() => FetchError::Transient(other.to_string()),
            other => FetchError::Other(other.to_string()),
        }
    }
}
