use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("valid username regex"));

/// Trims whitespace and a leading `@`.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}

/// Normalizes `raw` and checks it against Instagram's username alphabet.
///
/// # Errors
///
/// Returns [`CoreError::InvalidUsername`] if the normalized value is empty,
/// longer than 30 characters, or contains characters outside `[A-Za-z0-9._]`.
pub fn validate_username(raw: &str) -> Result<String, CoreError> {
    let username = normalize_username(raw);
    if USERNAME_RE.is_match(&username) {
        Ok(username)
    } else {
        Err(CoreError::InvalidUsername(raw.to_string()))
    }
}
