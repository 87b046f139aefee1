//! Instagram private-API response types.
//!
//! ## Observed shape
//!
//! ### `web_profile_info`
//! `GET /api/v1/users/web_profile_info/?username=X` returns
//! `{"data": {"user": {...}}, "status": "ok"}`. `user` is `null` for some
//! missing accounts instead of a 404, so it is modelled as `Option`.
//! Follower, following and post counts sit under GraphQL-style
//! `edge_*.count` wrappers.
//!
//! ### `feed/user/{id}`
//! Items are newest first. `taken_at` is unix seconds. `like_count` is
//! omitted when the owner hides likes; it defaults to zero. `caption` is
//! `null` for captionless posts. `media_type` is `1` image, `2` video,
//! `8` carousel (children under `carousel_media`).
//!
//! Pagination uses `more_available` + `next_max_id`; the cursor is sent back
//! as the `max_id` query parameter.

use serde::Deserialize;

/// Top-level response from `GET /api/v1/users/web_profile_info/`.
#[derive(Debug, Deserialize)]
pub struct WebProfileInfoResponse {
    pub data: WebProfileData,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebProfileData {
    #[serde(default)]
    pub user: Option<InstagramUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstagramUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub profile_pic_url_hd: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub business_category_name: Option<String>,
    pub edge_followed_by: EdgeCount,
    pub edge_follow: EdgeCount,
    pub edge_owner_to_timeline_media: EdgeCount,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EdgeCount {
    pub count: u64,
}

/// One page of `GET /api/v1/feed/user/{id}/`.
#[derive(Debug, Deserialize)]
pub struct UserFeedResponse {
    #[serde(default)]
    pub items: Vec<FeedItem>,
    #[serde(default)]
    pub more_available: bool,
    #[serde(default)]
    pub next_max_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedItem {
    pub code: String,
    pub taken_at: i64,
    pub media_type: u8,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub caption: Option<FeedCaption>,
    #[serde(default)]
    pub is_paid_partnership: bool,
    #[serde(default)]
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<MediaCandidate>,
    #[serde(default)]
    pub carousel_media: Vec<CarouselChild>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedCaption {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageVersions {
    #[serde(default)]
    pub candidates: Vec<MediaCandidate>,
}

/// Candidates are ordered largest first.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaCandidate {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarouselChild {
    #[serde(default)]
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<MediaCandidate>,
}
