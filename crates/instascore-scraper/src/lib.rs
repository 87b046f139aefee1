pub mod client;
pub mod error;
pub mod normalize;
pub mod rate_limit;
pub mod types;

pub use client::{ClientConfig, InstagramClient};
pub use error::ScraperError;
pub use normalize::{caption_hashtags, normalize_post, normalize_profile};
pub use types::{FeedItem, InstagramUser, UserFeedResponse, WebProfileInfoResponse};
