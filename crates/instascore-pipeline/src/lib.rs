//! Orchestration between a [`instascore_core::ProfileSource`] and the
//! scoring functions: throttling, single-profile analysis and the batch
//! leaderboard builder.

pub mod analyze;
pub mod leaderboard;
pub mod rankings;
pub mod throttle;

pub use analyze::{analyze_profile, profile_engagement};
pub use leaderboard::{build_leaderboard, top_accounts_leaderboard};
pub use rankings::StaticRankings;
pub use throttle::{NoDelay, RandomDelay, Throttle};

#[cfg(test)]
pub(crate) mod fakes;
