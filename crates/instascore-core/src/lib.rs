pub mod accounts;
pub mod app_config;
pub mod config;
pub mod error;
pub mod scoring;
pub mod source;
pub mod top_posts;
pub mod types;
pub mod username;

pub use accounts::{load_ranked_accounts, AccountConfig, AccountsFile};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use scoring::{
    consistency_score, engagement_rate, engagement_summary, influencer_breakdown, score_profile,
    ScoreWeights,
};
pub use source::{FetchError, ProfileSource, RankingSource};
pub use top_posts::{top_posts, TOP_POSTS_LIMIT};
pub use types::{
    EngagementSummary, LeaderboardEntry, MediaType, Post, ProfileRecord, ProfileSnapshot,
    RankedAccount, ScoreBreakdown, ScoreResult,
};
pub use username::{normalize_username, validate_username};
