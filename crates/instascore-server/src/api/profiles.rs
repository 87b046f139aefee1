use axum::{
    extract::{Path, State},
    Extension, Json,
};
use instascore_core::ProfileRecord;

use crate::middleware::RequestId;

use super::{map_db_error, parse_username, ApiError, AppState};

pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(username): Path<String>,
) -> Result<Json<ProfileRecord>, ApiError> {
    let username = parse_username(&req_id, &username)?;

    let record = state
        .profiles
        .find(&username)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("no stored profile for {username}"),
            )
        })?;

    Ok(Json(record))
}
