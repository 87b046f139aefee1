//! Engagement and influencer-score computation over a profile's post window.
//!
//! Everything here is pure: the same snapshot always yields the same numbers,
//! and nothing is carried over between profiles.
//!
//! ## Influencer score
//!
//! 1. Per-post engagement rate `100 × (likes + comments) / followers`, with
//!    the window's min and max tracked alongside min/max likes and comments.
//! 2. The aggregate engagement rate, average likes and average comments are
//!    min–max normalized against the range of the same quantity across the
//!    window. A degenerate range (max = min) normalizes to 0.
//! 3. Posting consistency: `max(0, 1 − σ/μ)` over the day gaps between
//!    consecutive posts (population σ). Fewer than two posts, or a zero mean
//!    gap, gives 0.
//! 4. `100 × Σ weightᵢ × componentᵢ`, rounded to two places. Weights sum to
//!    1.0 so the score stays in `[0, 100]`.
//!
//! Both the engagement rate and the influencer score are 0 when the profile
//! has no followers or the window is empty.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EngagementSummary, Post, ProfileSnapshot, ScoreBreakdown, ScoreResult};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Relative weights of the four influencer-score components.
///
/// Deserialization goes through [`ScoreWeights::new`], so a decoded value is
/// always validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreWeights")]
pub struct ScoreWeights {
    engagement: f64,
    likes: f64,
    comments: f64,
    consistency: f64,
}

#[derive(Deserialize)]
struct RawScoreWeights {
    engagement: f64,
    likes: f64,
    comments: f64,
    consistency: f64,
}

impl TryFrom<RawScoreWeights> for ScoreWeights {
    type Error = CoreError;

    fn try_from(raw: RawScoreWeights) -> Result<Self, Self::Error> {
        Self::new(raw.engagement, raw.likes, raw.comments, raw.consistency)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            engagement: 0.3,
            likes: 0.25,
            comments: 0.2,
            consistency: 0.25,
        }
    }
}

impl ScoreWeights {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWeights`] if any weight is negative or not
    /// finite, or if the weights do not sum to 1.0.
    pub fn new(
        engagement: f64,
        likes: f64,
        comments: f64,
        consistency: f64,
    ) -> Result<Self, CoreError> {
        let all = [engagement, likes, comments, consistency];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {all:?}"
            )));
        }

        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::InvalidWeights(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(Self {
            engagement,
            likes,
            comments,
            consistency,
        })
    }

    fn combine(&self, engagement: f64, likes: f64, comments: f64, consistency: f64) -> f64 {
        self.engagement * engagement
            + self.likes * likes
            + self.comments * comments
            + self.consistency * consistency
    }
}

/// Inclusive min/max of one quantity across the window.
#[derive(Debug, Clone, Copy)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn over(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    fn normalize(self, value: f64) -> f64 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_precision_loss)]
fn averages(posts: &[Post]) -> (f64, f64) {
    if posts.is_empty() {
        return (0.0, 0.0);
    }
    let n = posts.len() as f64;
    let likes: u64 = posts.iter().map(|p| p.like_count).sum();
    let comments: u64 = posts.iter().map(|p| p.comment_count).sum();
    (likes as f64 / n, comments as f64 / n)
}

#[allow(clippy::cast_precision_loss)]
fn rate(likes: f64, comments: f64, followers: u64) -> f64 {
    if followers == 0 {
        0.0
    } else {
        100.0 * (likes + comments) / followers as f64
    }
}

/// `round(100 × (average_likes + average_comments) / followers, 2)`, or 0
/// when `followers` is 0.
#[must_use]
pub fn engagement_rate(average_likes: f64, average_comments: f64, followers: u64) -> f64 {
    round2(rate(average_likes, average_comments, followers))
}

/// Averages (rounded to two places) and the engagement rate of a snapshot.
///
/// The rate is derived from the unrounded averages.
#[must_use]
pub fn engagement_summary(snapshot: &ProfileSnapshot) -> EngagementSummary {
    let (average_likes, average_comments) = averages(&snapshot.posts);
    EngagementSummary {
        average_likes: round2(average_likes),
        average_comments: round2(average_comments),
        engagement_rate_percent: engagement_rate(
            average_likes,
            average_comments,
            snapshot.follower_count,
        ),
    }
}

/// Regularity of the posting cadence in `[0, 1]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn consistency_score(posts: &[Post]) -> f64 {
    if posts.len() < 2 {
        return 0.0;
    }

    let mut dates: Vec<NaiveDate> = posts.iter().map(Post::posted_on).collect();
    dates.sort_unstable();

    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days() as f64)
        .collect();
    let n = gaps.len() as f64;
    let mean = gaps.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }

    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt() / mean).max(0.0)
}

/// Computes every influencer-score component for `snapshot`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn influencer_breakdown(snapshot: &ProfileSnapshot, weights: &ScoreWeights) -> ScoreBreakdown {
    let posts = &snapshot.posts;
    let followers = snapshot.follower_count;

    let zero = ScoreBreakdown {
        normalized_engagement: 0.0,
        normalized_likes: 0.0,
        normalized_comments: 0.0,
        consistency_score: 0.0,
        influencer_score: 0.0,
    };
    if followers == 0 || posts.is_empty() {
        return zero;
    }

    let post_rates = posts
        .iter()
        .map(|p| rate(p.like_count as f64, p.comment_count as f64, followers));
    let (Some(rates), Some(likes), Some(comments)) = (
        Range::over(post_rates),
        Range::over(posts.iter().map(|p| p.like_count as f64)),
        Range::over(posts.iter().map(|p| p.comment_count as f64)),
    ) else {
        return zero;
    };

    let (average_likes, average_comments) = averages(posts);
    let engagement_rate_percent = engagement_rate(average_likes, average_comments, followers);

    let normalized_engagement = rates.normalize(engagement_rate_percent);
    let normalized_likes = likes.normalize(average_likes);
    let normalized_comments = comments.normalize(average_comments);
    let consistency = consistency_score(posts);

    let influencer_score = round2(
        100.0
            * weights.combine(
                normalized_engagement,
                normalized_likes,
                normalized_comments,
                consistency,
            ),
    );

    ScoreBreakdown {
        normalized_engagement,
        normalized_likes,
        normalized_comments,
        consistency_score: consistency,
        influencer_score,
    }
}

/// Full score for a snapshot.
#[must_use]
pub fn score_profile(snapshot: &ProfileSnapshot, weights: &ScoreWeights) -> ScoreResult {
    let summary = engagement_summary(snapshot);
    let breakdown = influencer_breakdown(snapshot, weights);
    ScoreResult {
        average_likes: summary.average_likes,
        average_comments: summary.average_comments,
        engagement_rate_percent: summary.engagement_rate_percent,
        influencer_score: breakdown.influencer_score,
    }
}

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;
