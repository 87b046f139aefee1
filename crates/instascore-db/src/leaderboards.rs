//! Database operations for `leaderboard_snapshots`.
//!
//! Snapshots are insert-only. Each row stores the full ordered entry list as
//! JSONB so a past leaderboard can be served exactly as it was built.

use chrono::{DateTime, Utc};
use instascore_core::LeaderboardEntry;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `leaderboard_snapshots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaderboardSnapshotRow {
    pub id: i64,
    pub public_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub entry_count: i32,
    pub entries: serde_json::Value,
}

/// A stored leaderboard with its entries decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub id: i64,
    pub public_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub entries: Vec<LeaderboardEntry>,
}

impl TryFrom<LeaderboardSnapshotRow> for LeaderboardSnapshot {
    type Error = DbError;

    fn try_from(row: LeaderboardSnapshotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            public_id: row.public_id,
            captured_at: row.captured_at,
            entries: serde_json::from_value(row.entries)?,
        })
    }
}

/// Stores `entries` as a new snapshot, in the given order.
///
/// Generates a UUID in Rust and binds it to `public_id`.
///
/// # Errors
///
/// Returns [`DbError::Json`] if the entries cannot be serialized, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_leaderboard_snapshot(
    pool: &PgPool,
    entries: &[LeaderboardEntry],
) -> Result<LeaderboardSnapshot, DbError> {
    let public_id = Uuid::new_v4();
    let entry_count = i32::try_from(entries.len()).unwrap_or(i32::MAX);
    let document = serde_json::to_value(entries)?;

    let row = sqlx::query_as::<_, LeaderboardSnapshotRow>(
        "INSERT INTO leaderboard_snapshots (public_id, entry_count, entries) \
         VALUES ($1, $2, $3) \
         RETURNING id, public_id, captured_at, entry_count, entries",
    )
    .bind(public_id)
    .bind(entry_count)
    .bind(document)
    .fetch_one(pool)
    .await?;

    tracing::debug!(%public_id, entry_count, "leaderboard snapshot stored");
    LeaderboardSnapshot::try_from(row)
}

/// Returns the most recently captured snapshot, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or [`DbError::Json`] if the
/// stored entries do not deserialize.
pub async fn latest_leaderboard_snapshot(
    pool: &PgPool,
) -> Result<Option<LeaderboardSnapshot>, DbError> {
    let row = sqlx::query_as::<_, LeaderboardSnapshotRow>(
        "SELECT id, public_id, captured_at, entry_count, entries \
         FROM leaderboard_snapshots \
         ORDER BY captured_at DESC, id DESC \
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    row.map(LeaderboardSnapshot::try_from).transpose()
}
