//! Ranked account list loaded from YAML.
//!
//! ```yaml
//! accounts:
//!   - username: instagram
//!     account_name: Instagram
//!   - username: "@cristiano"
//!     account_name: Cristiano Ronaldo
//! ```
//!
//! Rank is the 1-based position in the file.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::RankedAccount;
use crate::username::validate_username;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub account_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountsFile {
    pub accounts: Vec<AccountConfig>,
}

impl AccountsFile {
    /// Validates the file and assigns ranks in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for invalid or duplicate usernames
    /// and empty account names.
    pub fn into_ranked(self) -> Result<Vec<RankedAccount>, ConfigError> {
        let mut seen = HashSet::new();
        let mut ranked = Vec::with_capacity(self.accounts.len());

        for (index, account) in self.accounts.into_iter().enumerate() {
            let username = validate_username(&account.username)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;

            if account.account_name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "account '{username}' has an empty account_name"
                )));
            }

            if !seen.insert(username.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate username: '{username}'"
                )));
            }

            let rank = u32::try_from(index + 1).map_err(|_| {
                ConfigError::Validation("accounts file has too many entries".to_string())
            })?;

            ranked.push(RankedAccount {
                rank,
                username,
                account_name: account.account_name.trim().to_string(),
            });
        }

        Ok(ranked)
    }
}

/// Load and validate the ranked accounts file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_ranked_accounts(path: &Path) -> Result<Vec<RankedAccount>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AccountsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_ranked_accounts(&content)
}

fn parse_ranked_accounts(content: &str) -> Result<Vec<RankedAccount>, ConfigError> {
    let file: AccountsFile = serde_yaml::from_str(content)?;
    file.into_ranked()
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
