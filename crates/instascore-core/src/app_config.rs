use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Only commands that touch Postgres need this; see [`AppConfig::require_database_url`].
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub accounts_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_base_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_app_id: String,
    pub scraper_session_id: Option<String>,
    pub scraper_max_attempts: u32,
    pub scraper_retry_backoff_base_ms: u64,
    pub throttle_min_ms: u64,
    pub throttle_max_ms: u64,
    pub post_window: usize,
    pub leaderboard_size: usize,
    pub leaderboard_batch_size: usize,
    /// Bearer tokens accepted by the HTTP API. Empty disables auth.
    pub api_keys: Vec<String>,
    pub rate_limit_per_minute: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("accounts_path", &self.accounts_path)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("scraper_base_url", &self.scraper_base_url)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_app_id", &self.scraper_app_id)
            .field(
                "scraper_session_id",
                &self.scraper_session_id.as_ref().map(|_| "[redacted]"),
            )
            .field("scraper_max_attempts", &self.scraper_max_attempts)
            .field(
                "scraper_retry_backoff_base_ms",
                &self.scraper_retry_backoff_base_ms,
            )
            .field("throttle_min_ms", &self.throttle_min_ms)
            .field("throttle_max_ms", &self.throttle_max_ms)
            .field("post_window", &self.post_window)
            .field("leaderboard_size", &self.leaderboard_size)
            .field("leaderboard_batch_size", &self.leaderboard_batch_size)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

impl AppConfig {
    /// The Postgres URL, for commands that open a pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `DATABASE_URL` was not set.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }
}
