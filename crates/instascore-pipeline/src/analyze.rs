//! Single-profile fetch-and-score.

use chrono::Utc;
use instascore_core::{
    engagement_summary, EngagementSummary, FetchError, ProfileRecord, ProfileSource, ScoreWeights,
};

use crate::throttle::Throttle;

/// Fetches `username` after the throttle and builds the full scored record.
///
/// # Errors
///
/// Propagates the source's [`FetchError`] unchanged.
pub async fn analyze_profile(
    source: &dyn ProfileSource,
    throttle: &dyn Throttle,
    username: &str,
    weights: &ScoreWeights,
) -> Result<ProfileRecord, FetchError> {
    throttle.wait().await;
    let snapshot = source.fetch_profile(username).await?;
    let record = ProfileRecord::from_snapshot(snapshot, weights, Utc::now());
    tracing::info!(
        username,
        followers = record.profile.follower_count,
        posts = record.profile.posts.len(),
        engagement_rate_percent = record.score.engagement_rate_percent,
        influencer_score = record.score.influencer_score,
        "profile analyzed"
    );
    Ok(record)
}

/// Like [`analyze_profile`] but only computes the engagement averages.
///
/// # Errors
///
/// Propagates the source's [`FetchError`] unchanged.
pub async fn profile_engagement(
    source: &dyn ProfileSource,
    throttle: &dyn Throttle,
    username: &str,
) -> Result<EngagementSummary, FetchError> {
    throttle.wait().await;
    let snapshot = source.fetch_profile(username).await?;
    Ok(engagement_summary(&snapshot))
}
