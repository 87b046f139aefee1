//! `leaderboard` command: rank, fetch, score and snapshot the top accounts.

use std::fmt::Write as _;

use anyhow::Context;
use instascore_core::{AppConfig, LeaderboardEntry};
use instascore_db::LeaderboardRepository;
use instascore_pipeline::{top_accounts_leaderboard, RandomDelay, StaticRankings};

/// Build the leaderboard for the first `limit` ranked accounts and store a
/// snapshot unless `dry_run`.
///
/// Per-account fetch failures are logged and skipped by the pipeline.
///
/// # Errors
///
/// Returns an error if the accounts file cannot be loaded or the snapshot
/// cannot be written.
pub(crate) async fn run_leaderboard(
    config: &AppConfig,
    limit: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let size = limit.unwrap_or(config.leaderboard_size);
    let rankings = StaticRankings::from_file(&config.accounts_path).with_context(|| {
        format!(
            "failed to load ranked accounts from {}",
            config.accounts_path.display()
        )
    })?;
    if rankings.is_empty() || size == 0 {
        println!("no ranked accounts to process");
        return Ok(());
    }

    let client = crate::build_client(config)?;
    let throttle = RandomDelay::from_app_config(config);
    let entries = top_accounts_leaderboard(
        &rankings,
        &client,
        &throttle,
        size,
        config.leaderboard_batch_size,
    )
    .await?;

    print!("{}", format_table(&entries));

    if dry_run {
        println!("dry-run: snapshot not stored");
        return Ok(());
    }

    let store = crate::connect_store(config).await?;
    let snapshot = store
        .insert_snapshot(&entries)
        .await
        .context("failed to store leaderboard snapshot")?;
    println!(
        "stored snapshot {} with {} entries",
        snapshot.public_id,
        snapshot.entries.len()
    );
    Ok(())
}

pub(crate) fn format_table(entries: &[LeaderboardEntry]) -> String {
    let mut out = format!(
        "{:<6}{:<26}{:>14}{:>12}{:>9}  {}\n",
        "RANK", "USERNAME", "FOLLOWERS", "ENGAGEMENT", "POSTS", "ACCOUNT"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<6}{:<26}{:>14}{:>11.2}%{:>9}  {}",
            entry.rank,
            entry.username,
            entry.followers,
            entry.engagement_rate_percent,
            entry.total_posts,
            entry.account_name
        );
    }
    out
}
