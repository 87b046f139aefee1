//! Repository traits the HTTP and CLI layers program against.

use async_trait::async_trait;
use instascore_core::{LeaderboardEntry, ProfileRecord};
use sqlx::PgPool;

use crate::leaderboards::{insert_leaderboard_snapshot, latest_leaderboard_snapshot, LeaderboardSnapshot};
use crate::profiles::{get_profile, upsert_profile, UpsertOutcome};
use crate::{health_check, DbError};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn upsert(&self, record: &ProfileRecord) -> Result<UpsertOutcome, DbError>;

    /// Usernames match case-insensitively.
    async fn find(&self, username: &str) -> Result<Option<ProfileRecord>, DbError>;
}

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    async fn insert_snapshot(
        &self,
        entries: &[LeaderboardEntry],
    ) -> Result<LeaderboardSnapshot, DbError>;

    async fn latest_snapshot(&self) -> Result<Option<LeaderboardSnapshot>, DbError>;
}

/// Liveness of whatever backs the repositories.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), DbError>;
}

/// Postgres-backed repositories over a shared pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn upsert(&self, record: &ProfileRecord) -> Result<UpsertOutcome, DbError> {
        upsert_profile(&self.pool, record).await
    }

    async fn find(&self, username: &str) -> Result<Option<ProfileRecord>, DbError> {
        get_profile(&self.pool, username).await
    }
}

#[async_trait]
impl LeaderboardRepository for PgStore {
    async fn insert_snapshot(
        &self,
        entries: &[LeaderboardEntry],
    ) -> Result<LeaderboardSnapshot, DbError> {
        insert_leaderboard_snapshot(&self.pool, entries).await
    }

    async fn latest_snapshot(&self) -> Result<Option<LeaderboardSnapshot>, DbError> {
        latest_leaderboard_snapshot(&self.pool).await
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), DbError> {
        health_check(&self.pool).await
    }
}
