use crate::types::Post;

pub const TOP_POSTS_LIMIT: usize = 3;

/// The most-liked posts of a window, highest first.
///
/// The sort is stable, so posts with equal like counts keep their fetch
/// order.
#[must_use]
pub fn top_posts(posts: &[Post]) -> Vec<Post> {
    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    ranked
        .into_iter()
        .take(TOP_POSTS_LIMIT)
        .cloned()
        .collect()
}
