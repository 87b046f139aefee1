//! Batch leaderboard builder.
//!
//! Accounts are processed sequentially in rank order. Batches only group
//! log output and pacing; they never change which entries come back.

use instascore_core::{
    FetchError, LeaderboardEntry, ProfileSource, RankedAccount, RankingSource,
};

use crate::throttle::Throttle;

/// Fetches every account once and returns an entry per successful fetch,
/// in the order of `accounts`. Failed fetches are logged and skipped.
///
/// A `batch_size` of zero is treated as one.
pub async fn build_leaderboard(
    source: &dyn ProfileSource,
    throttle: &dyn Throttle,
    accounts: &[RankedAccount],
    batch_size: usize,
) -> Vec<LeaderboardEntry> {
    let batch_size = batch_size.max(1);
    let mut entries = Vec::with_capacity(accounts.len());
    let mut skipped = 0usize;

    for (index, batch) in accounts.chunks(batch_size).enumerate() {
        tracing::info!(
            batch = index + 1,
            accounts = batch.len(),
            "processing leaderboard batch"
        );
        for account in batch {
            throttle.wait().await;
            match source.fetch_profile(&account.username).await {
                Ok(snapshot) => entries.push(LeaderboardEntry::from_snapshot(account, &snapshot)),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        rank = account.rank,
                        username = %account.username,
                        error = %e,
                        "skipping leaderboard account"
                    );
                }
            }
        }
    }

    tracing::info!(entries = entries.len(), skipped, "leaderboard built");
    entries
}

/// Takes the first `size` accounts from `rankings` and builds their
/// leaderboard.
///
/// # Errors
///
/// Returns the ranking source's error; per-account fetch failures are
/// skipped instead.
pub async fn top_accounts_leaderboard(
    rankings: &dyn RankingSource,
    source: &dyn ProfileSource,
    throttle: &dyn Throttle,
    size: usize,
    batch_size: usize,
) -> Result<Vec<LeaderboardEntry>, FetchError> {
    let mut accounts = rankings.ranked_accounts(size).await?;
    accounts.truncate(size);
    Ok(build_leaderboard(source, throttle, &accounts, batch_size).await)
}
