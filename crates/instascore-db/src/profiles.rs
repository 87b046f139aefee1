//! Database operations for `profiles`.
//!
//! One row per username. The full [`ProfileRecord`] lives in the `document`
//! JSONB column; follower count and scores are copied into plain columns so
//! they can be sorted on without unpacking the document.

use chrono::{DateTime, Utc};
use instascore_core::ProfileRecord;
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub username: String,
    pub document: serde_json::Value,
    pub follower_count: i64,
    pub engagement_rate_percent: f64,
    pub influencer_score: f64,
    pub fetched_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// # Errors
    ///
    /// Returns [`DbError::Json`] if the stored document no longer matches
    /// the [`ProfileRecord`] shape.
    pub fn into_record(self) -> Result<ProfileRecord, DbError> {
        Ok(serde_json::from_value(self.document)?)
    }
}

/// Whether an upsert created the row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

impl UpsertOutcome {
    #[must_use]
    pub fn from_inserted(inserted: bool) -> Self {
        if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        }
    }
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsertOutcome::Inserted => write!(f, "inserted"),
            UpsertOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// Storage key for a username. Instagram handles are case-insensitive.
pub(crate) fn profile_key(username: &str) -> String {
    username.to_lowercase()
}

/// Upserts the record keyed by its username.
///
/// Conflicts on `username` replace the document and the denormalized score
/// columns in place and bump `updated_at`. `xmax = 0` only holds for a row
/// version created by this statement's INSERT branch.
///
/// # Errors
///
/// Returns [`DbError::Json`] if the record cannot be serialized, or
/// [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_profile(pool: &PgPool, record: &ProfileRecord) -> Result<UpsertOutcome, DbError> {
    let document = serde_json::to_value(record)?;
    let follower_count = i64::try_from(record.profile.follower_count).unwrap_or(i64::MAX);

    let inserted: bool = sqlx::query_scalar::<_, bool>(
        "INSERT INTO profiles \
             (username, document, follower_count, engagement_rate_percent, \
              influencer_score, fetched_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (username) DO UPDATE SET \
             document                = EXCLUDED.document, \
             follower_count          = EXCLUDED.follower_count, \
             engagement_rate_percent = EXCLUDED.engagement_rate_percent, \
             influencer_score        = EXCLUDED.influencer_score, \
             fetched_at              = EXCLUDED.fetched_at, \
             updated_at              = NOW() \
         RETURNING (xmax = 0) AS inserted",
    )
    .bind(profile_key(record.username()))
    .bind(document)
    .bind(follower_count)
    .bind(record.score.engagement_rate_percent)
    .bind(record.score.influencer_score)
    .bind(record.fetched_at)
    .fetch_one(pool)
    .await?;

    let outcome = UpsertOutcome::from_inserted(inserted);
    tracing::debug!(username = record.username(), %outcome, "profile upserted");
    Ok(outcome)
}

/// Returns the stored row for `username`, or `None` if it was never scraped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_profile_row(pool: &PgPool, username: &str) -> Result<Option<ProfileRow>, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT username, document, follower_count, engagement_rate_percent, \
                influencer_score, fetched_at, created_at, updated_at \
         FROM profiles \
         WHERE username = $1",
    )
    .bind(profile_key(username))
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the stored record for `username`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or [`DbError::Json`] if the
/// document does not deserialize.
pub async fn get_profile(pool: &PgPool, username: &str) -> Result<Option<ProfileRecord>, DbError> {
    get_profile_row(pool, username)
        .await?
        .map(ProfileRow::into_record)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display_matches_serde() {
        assert_eq!(UpsertOutcome::Inserted.to_string(), "inserted");
        assert_eq!(
            serde_json::to_value(UpsertOutcome::Updated).unwrap(),
            serde_json::json!("updated")
        );
        assert_eq!(UpsertOutcome::from_inserted(false), UpsertOutcome::Updated);
    }

    #[test]
    fn profile_key_is_case_insensitive() {
        assert_eq!(profile_key("NatGeo"), profile_key("natgeo"));
    }
}
