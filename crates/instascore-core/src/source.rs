//! Fetch seams: where profile snapshots and ranked account lists come from.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ProfileSnapshot, RankedAccount};

/// Failure classes for a single fetch.
///
/// - `NotFound`: the profile does not exist. Never retried.
/// - `Transient`: connectivity or rate limiting. Retried by the source up to
///   its attempt ceiling before being surfaced.
/// - `Other`: anything else. Not retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("temporarily unavailable: {0}")]
    Transient(String),

    #[error("fetch failed: {0}")]
    Other(String),
}

/// Provides profile snapshots keyed by username.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileSnapshot, FetchError>;
}

/// Provides an externally ranked list of accounts, best first.
#[async_trait]
pub trait RankingSource: Send + Sync {
    async fn ranked_accounts(&self, limit: usize) -> Result<Vec<RankedAccount>, FetchError>;
}
