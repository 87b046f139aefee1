use axum::{extract::State, Extension, Json};
use instascore_core::LeaderboardEntry;
use instascore_db::LeaderboardSnapshot;
use instascore_pipeline::top_accounts_leaderboard;

use crate::middleware::RequestId;

use super::{map_db_error, map_fetch_error, ApiError, AppState};

/// Builds the leaderboard for the configured ranked accounts and stores it
/// as a snapshot. A storage failure is logged and the entries are still
/// returned.
pub(super) async fn top_accounts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = top_accounts_leaderboard(
        state.rankings.as_ref(),
        state.source.as_ref(),
        state.throttle.as_ref(),
        state.leaderboard_size,
        state.leaderboard_batch_size,
    )
    .await
    .map_err(|e| map_fetch_error(req_id.0.clone(), "ranked accounts", &e))?;

    match state.leaderboards.insert_snapshot(&entries).await {
        Ok(snapshot) => tracing::info!(
            public_id = %snapshot.public_id,
            entries = entries.len(),
            "leaderboard snapshot stored"
        ),
        Err(e) => tracing::error!(error = %e, "failed to store leaderboard snapshot"),
    }

    Ok(Json(entries))
}

pub(super) async fn latest_leaderboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<LeaderboardSnapshot>, ApiError> {
    let snapshot = state
        .leaderboards
        .latest_snapshot()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "no leaderboard stored yet"))?;

    Ok(Json(snapshot))
}
