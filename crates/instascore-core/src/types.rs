//! Domain types shared by the scraper, the scoring functions, storage and
//! the HTTP/CLI surfaces.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{engagement_summary, score_profile, ScoreWeights};
use crate::top_posts::top_posts;

const POST_URL_BASE: &str = "https://www.instagram.com/p/";
const PROFILE_URL_BASE: &str = "https://www.instagram.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Sidecar,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
            MediaType::Sidecar => write!(f, "sidecar"),
        }
    }
}

/// A single post inside a profile's recent-post window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub shortcode: String,
    pub post_url: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub caption_hashtags: Vec<String>,
    pub like_count: u64,
    pub comment_count: u64,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub is_sponsored: bool,
    pub media_type: MediaType,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

impl Post {
    /// Builds a bare image post with no caption or media URLs.
    #[must_use]
    pub fn new(
        shortcode: impl Into<String>,
        like_count: u64,
        comment_count: u64,
        posted_at: DateTime<Utc>,
    ) -> Self {
        let shortcode = shortcode.into();
        Self {
            post_url: Self::url_for(&shortcode),
            shortcode,
            caption: None,
            caption_hashtags: Vec::new(),
            like_count,
            comment_count,
            posted_at,
            is_sponsored: false,
            media_type: MediaType::Image,
            media_urls: Vec::new(),
        }
    }

    #[must_use]
    pub fn url_for(shortcode: &str) -> String {
        format!("{POST_URL_BASE}{shortcode}/")
    }

    /// Calendar date (UTC) the post was published on.
    #[must_use]
    pub fn posted_on(&self) -> NaiveDate {
        self.posted_at.date_naive()
    }
}

/// Point-in-time fetch of a profile's attributes and its most recent posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub business_category_name: Option<String>,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl ProfileSnapshot {
    /// Snapshot with only the counters the scoring functions read.
    #[must_use]
    pub fn new(username: impl Into<String>, follower_count: u64, posts: Vec<Post>) -> Self {
        Self {
            username: username.into(),
            full_name: None,
            biography: None,
            profile_pic_url: None,
            is_verified: false,
            business_category_name: None,
            follower_count,
            following_count: 0,
            post_count: posts.len() as u64,
            posts,
        }
    }

    #[must_use]
    pub fn profile_link(&self) -> String {
        format!("{PROFILE_URL_BASE}{}/", self.username)
    }
}

/// Averages and engagement rate over a post window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    pub average_likes: f64,
    pub average_comments: f64,
    pub engagement_rate_percent: f64,
}

/// Normalized inputs of the influencer score, kept for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub normalized_engagement: f64,
    pub normalized_likes: f64,
    pub normalized_comments: f64,
    pub consistency_score: f64,
    pub influencer_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub average_likes: f64,
    pub average_comments: f64,
    pub engagement_rate_percent: f64,
    pub influencer_score: f64,
}

impl ScoreResult {
    #[must_use]
    pub fn engagement(&self) -> EngagementSummary {
        EngagementSummary {
            average_likes: self.average_likes,
            average_comments: self.average_comments,
            engagement_rate_percent: self.engagement_rate_percent,
        }
    }
}

/// The persisted document: one per username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(flatten)]
    pub profile: ProfileSnapshot,
    pub top_posts: Vec<Post>,
    pub score: ScoreResult,
    pub fetched_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Scores `snapshot` and selects its top posts.
    #[must_use]
    pub fn from_snapshot(
        profile: ProfileSnapshot,
        weights: &ScoreWeights,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let score = score_profile(&profile, weights);
        let top_posts = top_posts(&profile.posts);
        Self {
            score,
            top_posts,
            profile,
            fetched_at,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.profile.username
    }
}

/// One row of an externally ranked account list. `rank` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedAccount {
    pub rank: u32,
    pub username: String,
    pub account_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub account_name: String,
    pub profile_link: String,
    pub followers: u64,
    pub following: u64,
    pub total_posts: u64,
    pub engagement_rate_percent: f64,
}

impl LeaderboardEntry {
    #[must_use]
    pub fn from_snapshot(account: &RankedAccount, snapshot: &ProfileSnapshot) -> Self {
        Self {
            rank: account.rank,
            username: account.username.clone(),
            account_name: account.account_name.clone(),
            profile_link: snapshot.profile_link(),
            followers: snapshot.follower_count,
            following: snapshot.following_count,
            total_posts: snapshot.post_count,
            engagement_rate_percent: engagement_summary(snapshot).engagement_rate_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn post_url_uses_shortcode() {
        let post = Post::new("C1a2b3", 1, 1, at(1));
        assert_eq!(post.post_url, "https://www.instagram.com/p/C1a2b3/");
        assert_eq!(post.posted_on(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn profile_record_serializes_flat() {
        let snapshot = ProfileSnapshot::new(
            "natgeo",
            100,
            vec![Post::new("a", 10, 2, at(1)), Post::new("b", 30, 5, at(3))],
        );
        let record = ProfileRecord::from_snapshot(snapshot, &ScoreWeights::default(), at(4));
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["username"], "natgeo");
        assert_eq!(json["follower_count"], 100);
        assert_eq!(json["top_posts"][0]["shortcode"], "b");
        assert!((json["score"]["engagement_rate_percent"].as_f64().unwrap() - 23.5).abs() < 1e-9);

        let back: ProfileRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn leaderboard_entry_copies_rank_and_counts() {
        let account = RankedAccount {
            rank: 3,
            username: "nasa".to_string(),
            account_name: "NASA".to_string(),
        };
        let mut snapshot = ProfileSnapshot::new("nasa", 0, vec![Post::new("a", 5, 1, at(1))]);
        snapshot.following_count = 80;
        snapshot.post_count = 4_000;

        let entry = LeaderboardEntry::from_snapshot(&account, &snapshot);
        assert_eq!(entry.rank, 3);
        assert_eq!(entry.profile_link, "https://www.instagram.com/nasa/");
        assert_eq!(entry.following, 80);
        assert_eq!(entry.total_posts, 4_000);
        assert!(entry.engagement_rate_percent.abs() < f64::EPSILON);
    }
}
