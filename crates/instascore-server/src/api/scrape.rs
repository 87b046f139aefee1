use axum::{
    extract::{Path, State},
    Extension, Json,
};
use instascore_core::ProfileRecord;
use instascore_pipeline::analyze_profile;

use crate::middleware::RequestId;

use super::{map_fetch_error, parse_username, ApiError, AppState};

/// Fetches, scores and stores a profile. A storage failure is logged and the
/// scored record is still returned.
pub(super) async fn scrape_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(username): Path<String>,
) -> Result<Json<ProfileRecord>, ApiError> {
    let username = parse_username(&req_id, &username)?;

    let record = analyze_profile(
        state.source.as_ref(),
        state.throttle.as_ref(),
        &username,
        &state.weights,
    )
    .await
    .map_err(|e| map_fetch_error(req_id.0.clone(), &username, &e))?;

    match state.profiles.upsert(&record).await {
        Ok(outcome) => tracing::info!(username = %record.username(), %outcome, "profile stored"),
        Err(e) => tracing::error!(
            username = %record.username(),
            error = %e,
            "failed to store profile"
        ),
    }

    Ok(Json(record))
}
