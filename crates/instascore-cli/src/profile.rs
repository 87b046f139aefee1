//! Single-profile command handlers: `profile`, `engagement`, `show`.

use std::fmt::Write as _;
use std::io::Write as _;

use anyhow::Context;
use instascore_core::{validate_username, AppConfig, ProfileRecord, ScoreWeights};
use instascore_db::ProfileRepository;
use instascore_pipeline::{analyze_profile, profile_engagement, RandomDelay};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Fetch, score and (unless `dry_run`) upsert one profile.
///
/// Prompts on stdin when `username` is `None`.
///
/// # Errors
///
/// Returns an error if the username is invalid, the fetch fails, or the
/// database write fails.
pub(crate) async fn run_profile(
    config: &AppConfig,
    username: Option<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let username = match username {
        Some(raw) => validate_username(&raw)?,
        None => {
            print!("Instagram username: ");
            std::io::stdout().flush()?;
            read_username(&mut BufReader::new(tokio::io::stdin())).await?
        }
    };

    let client = crate::build_client(config)?;
    let throttle = RandomDelay::from_app_config(config);
    let record = analyze_profile(&client, &throttle, &username, &ScoreWeights::default())
        .await
        .with_context(|| format!("failed to analyze profile '{username}'"))?;

    print!("{}", render_record(&record));

    if dry_run {
        println!("dry-run: not stored");
        return Ok(());
    }

    let store = crate::connect_store(config).await?;
    let outcome = store
        .upsert(&record)
        .await
        .with_context(|| format!("failed to store profile '{username}'"))?;
    println!("{outcome}");
    Ok(())
}

/// Print the engagement averages for a profile without storing anything.
///
/// # Errors
///
/// Returns an error if the username is invalid or the fetch fails.
pub(crate) async fn run_engagement(config: &AppConfig, raw: &str) -> anyhow::Result<()> {
    let username = validate_username(raw)?;
    let client = crate::build_client(config)?;
    let throttle = RandomDelay::from_app_config(config);
    let summary = profile_engagement(&client, &throttle, &username)
        .await
        .with_context(|| format!("failed to fetch profile '{username}'"))?;

    println!("average likes:    {:.2}", summary.average_likes);
    println!("average comments: {:.2}", summary.average_comments);
    println!("engagement rate:  {:.2}%", summary.engagement_rate_percent);
    Ok(())
}

/// Print the stored document for a profile as JSON.
///
/// # Errors
///
/// Returns an error if no record is stored or the query fails.
pub(crate) async fn run_show(config: &AppConfig, raw: &str) -> anyhow::Result<()> {
    let username = validate_username(raw)?;
    let store = crate::connect_store(config).await?;
    let record = store
        .find(&username)
        .await?
        .ok_or_else(|| {
            anyhow::anyhow!("no stored profile for '{username}'; run `profile {username}` first")
        })?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Read one line and validate it as a username.
pub(crate) async fn read_username<R>(reader: &mut R) -> anyhow::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .await
        .context("failed to read username")?;
    if read == 0 {
        anyhow::bail!("no username given");
    }
    Ok(validate_username(&line)?)
}

/// Human-readable summary of a scored profile.
pub(crate) fn render_record(record: &ProfileRecord) -> String {
    let profile = &record.profile;
    let score = &record.score;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", profile.username, profile.profile_link());
    if let Some(name) = &profile.full_name {
        let _ = writeln!(out, "name:             {name}");
    }
    let _ = writeln!(out, "followers:        {}", profile.follower_count);
    let _ = writeln!(out, "posts analyzed:   {}", profile.posts.len());
    let _ = writeln!(out, "average likes:    {:.2}", score.average_likes);
    let _ = writeln!(out, "average comments: {:.2}", score.average_comments);
    let _ = writeln!(out, "engagement rate:  {:.2}%", score.engagement_rate_percent);
    let _ = writeln!(out, "influencer score: {:.2}", score.influencer_score);

    if !record.top_posts.is_empty() {
        let _ = writeln!(out, "top posts:");
        for post in &record.top_posts {
            let _ = writeln!(
                out,
                "  {:>8} likes {:>6} comments  {}",
                post.like_count, post.comment_count, post.post_url
            );
        }
    }
    out
}
