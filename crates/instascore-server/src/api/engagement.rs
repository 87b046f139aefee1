use axum::{
    extract::{Path, State},
    Extension, Json,
};
use instascore_core::EngagementSummary;
use instascore_pipeline::profile_engagement;

use crate::middleware::RequestId;

use super::{map_fetch_error, parse_username, ApiError, AppState};

pub(super) async fn engagement_rate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(username): Path<String>,
) -> Result<Json<EngagementSummary>, ApiError> {
    let username = parse_username(&req_id, &username)?;

    let summary = profile_engagement(state.source.as_ref(), state.throttle.as_ref(), &username)
        .await
        .map_err(|e| map_fetch_error(req_id.0.clone(), &username, &e))?;

    Ok(Json(summary))
}
