use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Instagram 219.0.0.12.117 Android (31/12; 420dpi; 1080x2220; samsung; SM-G991B; o1s; exynos2100; en_US; 346138365)";
pub const DEFAULT_APP_ID: &str = "936619743392459";

const MAX_FETCH_ATTEMPTS: u32 = 3;
const MAX_POST_WINDOW: usize = 50;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = lookup("DATABASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let env = parse_environment(&or_default("INSTASCORE_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_as(
        "INSTASCORE_BIND_ADDR",
        &or_default("INSTASCORE_BIND_ADDR", "0.0.0.0:8000"),
    )?;
    let log_level = or_default("INSTASCORE_LOG_LEVEL", "info");
    let accounts_path = PathBuf::from(or_default(
        "INSTASCORE_ACCOUNTS_PATH",
        "./config/top_accounts.yaml",
    ));

    let db_max_connections: u32 = parse_as(
        "INSTASCORE_DB_MAX_CONNECTIONS",
        &or_default("INSTASCORE_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections: u32 = parse_as(
        "INSTASCORE_DB_MIN_CONNECTIONS",
        &or_default("INSTASCORE_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_as(
        "INSTASCORE_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("INSTASCORE_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let scraper_base_url = or_default("INSTASCORE_SCRAPER_BASE_URL", "https://i.instagram.com");
    let scraper_request_timeout_secs: u64 = parse_as(
        "INSTASCORE_SCRAPER_REQUEST_TIMEOUT_SECS",
        &or_default("INSTASCORE_SCRAPER_REQUEST_TIMEOUT_SECS", "30"),
    )?;
    let scraper_user_agent = or_default("INSTASCORE_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_app_id = or_default("INSTASCORE_SCRAPER_APP_ID", DEFAULT_APP_ID);
    let scraper_session_id = lookup("INSTASCORE_SCRAPER_SESSION_ID")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let scraper_max_attempts: u32 = parse_as(
        "INSTASCORE_SCRAPER_MAX_ATTEMPTS",
        &or_default("INSTASCORE_SCRAPER_MAX_ATTEMPTS", "3"),
    )?;
    if !(1..=MAX_FETCH_ATTEMPTS).contains(&scraper_max_attempts) {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSTASCORE_SCRAPER_MAX_ATTEMPTS".to_string(),
            reason: format!("must be between 1 and {MAX_FETCH_ATTEMPTS}"),
        });
    }
    let scraper_retry_backoff_base_ms: u64 = parse_as(
        "INSTASCORE_SCRAPER_RETRY_BACKOFF_BASE_MS",
        &or_default("INSTASCORE_SCRAPER_RETRY_BACKOFF_BASE_MS", "1000"),
    )?;

    let throttle_min_ms: u64 = parse_as(
        "INSTASCORE_THROTTLE_MIN_MS",
        &or_default("INSTASCORE_THROTTLE_MIN_MS", "2000"),
    )?;
    let throttle_max_ms: u64 = parse_as(
        "INSTASCORE_THROTTLE_MAX_MS",
        &or_default("INSTASCORE_THROTTLE_MAX_MS", "5000"),
    )?;
    if throttle_min_ms > throttle_max_ms {
        return Err(ConfigError::Validation(format!(
            "INSTASCORE_THROTTLE_MIN_MS ({throttle_min_ms}) exceeds INSTASCORE_THROTTLE_MAX_MS ({throttle_max_ms})"
        )));
    }

    let post_window: usize = parse_as(
        "INSTASCORE_POST_WINDOW",
        &or_default("INSTASCORE_POST_WINDOW", "12"),
    )?;
    if !(1..=MAX_POST_WINDOW).contains(&post_window) {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSTASCORE_POST_WINDOW".to_string(),
            reason: format!("must be between 1 and {MAX_POST_WINDOW}"),
        });
    }

    let leaderboard_size: usize = parse_as(
        "INSTASCORE_LEADERBOARD_SIZE",
        &or_default("INSTASCORE_LEADERBOARD_SIZE", "50"),
    )?;
    let leaderboard_batch_size: usize = parse_as(
        "INSTASCORE_LEADERBOARD_BATCH_SIZE",
        &or_default("INSTASCORE_LEADERBOARD_BATCH_SIZE", "5"),
    )?;
    if leaderboard_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSTASCORE_LEADERBOARD_BATCH_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let api_keys: Vec<String> = lookup("INSTASCORE_API_KEYS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    let rate_limit_per_minute: u32 = parse_as(
        "INSTASCORE_RATE_LIMIT_PER_MINUTE",
        &or_default("INSTASCORE_RATE_LIMIT_PER_MINUTE", "120"),
    )?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSTASCORE_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        accounts_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_base_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_app_id,
        scraper_session_id,
        scraper_max_attempts,
        scraper_retry_backoff_base_ms,
        throttle_min_ms,
        throttle_max_ms,
        post_window,
        leaderboard_size,
        leaderboard_batch_size,
        api_keys,
        rate_limit_per_minute,
    })
}

/// Parse a raw env-var value, reporting the variable name on failure.
fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INSTASCORE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
