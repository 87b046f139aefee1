//! In-process repositories for tests and `--dry-run` style wiring.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use instascore_core::{LeaderboardEntry, ProfileRecord};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::leaderboards::LeaderboardSnapshot;
use crate::profiles::{profile_key, UpsertOutcome};
use crate::store::{LeaderboardRepository, ProfileRepository, StoreHealth};
use crate::DbError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, ProfileRecord>>,
    snapshots: Mutex<Vec<LeaderboardSnapshot>>,
    unavailable: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails as if the pool timed out.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.lock().await.len()
    }

    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.lock().await.len()
    }

    fn check(&self) -> Result<(), DbError> {
        if self.unavailable {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn upsert(&self, record: &ProfileRecord) -> Result<UpsertOutcome, DbError> {
        self.check()?;
        let previous = self
            .profiles
            .lock()
            .await
            .insert(profile_key(record.username()), record.clone());
        Ok(UpsertOutcome::from_inserted(previous.is_none()))
    }

    async fn find(&self, username: &str) -> Result<Option<ProfileRecord>, DbError> {
        self.check()?;
        Ok(self.profiles.lock().await.get(&profile_key(username)).cloned())
    }
}

#[async_trait]
impl LeaderboardRepository for MemoryStore {
    async fn insert_snapshot(
        &self,
        entries: &[LeaderboardEntry],
    ) -> Result<LeaderboardSnapshot, DbError> {
        self.check()?;
        let mut snapshots = self.snapshots.lock().await;
        let snapshot = LeaderboardSnapshot {
            id: i64::try_from(snapshots.len()).unwrap_or(i64::MAX) + 1,
            public_id: Uuid::new_v4(),
            captured_at: Utc::now(),
            entries: entries.to_vec(),
        };
        snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn latest_snapshot(&self) -> Result<Option<LeaderboardSnapshot>, DbError> {
        self.check()?;
        Ok(self.snapshots.lock().await.last().cloned())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.check()
    }
}
