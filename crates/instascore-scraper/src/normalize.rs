//! Conversion from Instagram API shapes to [`instascore_core::ProfileSnapshot`].

use std::sync::LazyLock;

use chrono::DateTime;
use instascore_core::{MediaType, Post, ProfileSnapshot};
use regex::Regex;

use crate::error::ScraperError;
use crate::types::{FeedItem, ImageVersions, InstagramUser, MediaCandidate};

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid hashtag regex"));

/// Hashtags in `text`, lowercased, in order of appearance.
#[must_use]
pub fn caption_hashtags(text: &str) -> Vec<String> {
    HASHTAG
        .captures_iter(text)
        .map(|c| c[1].to_lowercase())
        .collect()
}

/// Builds a snapshot from the profile attributes and up to `window` feed
/// items. Items that cannot be normalized are skipped with a warning.
#[must_use]
pub fn normalize_profile(
    user: InstagramUser,
    items: Vec<FeedItem>,
    window: usize,
) -> ProfileSnapshot {
    let posts = items
        .into_iter()
        .filter_map(|item| match normalize_post(item) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!(username = %user.username, error = %e, "skipping post");
                None
            }
        })
        .take(window)
        .collect();

    ProfileSnapshot {
        full_name: user.full_name.filter(|s| !s.is_empty()),
        biography: user.biography.filter(|s| !s.is_empty()),
        profile_pic_url: user.profile_pic_url_hd.or(user.profile_pic_url),
        is_verified: user.is_verified,
        business_category_name: user.business_category_name.filter(|s| !s.is_empty()),
        follower_count: user.edge_followed_by.count,
        following_count: user.edge_follow.count,
        post_count: user.edge_owner_to_timeline_media.count,
        username: user.username,
        posts,
    }
}

/// Normalizes one feed item.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] for an out-of-range `taken_at` or
/// an unknown `media_type`.
pub fn normalize_post(item: FeedItem) -> Result<Post, ScraperError> {
    let posted_at =
        DateTime::from_timestamp(item.taken_at, 0).ok_or_else(|| ScraperError::Normalization {
            shortcode: item.code.clone(),
            reason: format!("taken_at {} is out of range", item.taken_at),
        })?;

    let (media_type, media_urls) = match item.media_type {
        1 => (MediaType::Image, first_image(item.image_versions2.as_ref())),
        2 => (MediaType::Video, first_url(&item.video_versions)),
        8 => (
            MediaType::Sidecar,
            item.carousel_media
                .iter()
                .flat_map(|child| {
                    let video = first_url(&child.video_versions);
                    if video.is_empty() {
                        first_image(child.image_versions2.as_ref())
                    } else {
                        video
                    }
                })
                .collect(),
        ),
        other => {
            return Err(ScraperError::Normalization {
                shortcode: item.code,
                reason: format!("unknown media_type {other}"),
            })
        }
    };

    let caption = item
        .caption
        .map(|c| c.text)
        .filter(|text| !text.trim().is_empty());
    let caption_hashtags = caption.as_deref().map(caption_hashtags).unwrap_or_default();

    Ok(Post {
        post_url: Post::url_for(&item.code),
        shortcode: item.code,
        caption,
        caption_hashtags,
        like_count: item.like_count,
        comment_count: item.comment_count,
        posted_at,
        is_sponsored: item.is_paid_partnership,
        media_type,
        media_urls,
    })
}

fn first_url(candidates: &[MediaCandidate]) -> Vec<String> {
    candidates.first().map(|c| c.url.clone()).into_iter().collect()
}

fn first_image(versions: Option<&ImageVersions>) -> Vec<String> {
    versions.map(|v| first_url(&v.candidates)).unwrap_or_default()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
