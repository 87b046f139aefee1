//! Ranked account lists.

use std::path::Path;

use async_trait::async_trait;
use instascore_core::{load_ranked_accounts, ConfigError, FetchError, RankedAccount, RankingSource};

/// A fixed, already-ranked account list, typically loaded from the YAML
/// accounts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRankings {
    accounts: Vec<RankedAccount>,
}

impl StaticRankings {
    #[must_use]
    pub fn new(accounts: Vec<RankedAccount>) -> Self {
        Self { accounts }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let accounts = load_ranked_accounts(path)?;
        tracing::debug!(path = %path.display(), accounts = accounts.len(), "loaded ranked accounts");
        Ok(Self::new(accounts))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl RankingSource for StaticRankings {
    async fn ranked_accounts(&self, limit: usize) -> Result<Vec<RankedAccount>, FetchError> {
        Ok(self.accounts.iter().take(limit).cloned().collect())
    }
}
