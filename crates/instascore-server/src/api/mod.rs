mod engagement;
mod leaderboard;
mod profiles;
mod scrape;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use instascore_core::{validate_username, FetchError, ProfileSource, RankingSource, ScoreWeights};
use instascore_db::{DbError, LeaderboardRepository, ProfileRepository, StoreHealth};
use instascore_pipeline::Throttle;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimiter, RequestId,
    REQUEST_ID_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ProfileSource>,
    pub rankings: Arc<dyn RankingSource>,
    pub throttle: Arc<dyn Throttle>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub leaderboards: Arc<dyn LeaderboardRepository>,
    pub health: Arc<dyn StoreHealth>,
    pub weights: ScoreWeights,
    pub leaderboard_size: usize,
    pub leaderboard_batch_size: usize,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Validates a path username, answering 400 on malformed input.
pub(super) fn parse_username(request_id: &RequestId, raw: &str) -> Result<String, ApiError> {
    validate_username(raw)
        .map_err(|e| ApiError::new(request_id.0.clone(), "validation_error", e.to_string()))
}

pub(super) fn map_fetch_error(request_id: String, subject: &str, error: &FetchError) -> ApiError {
    match error {
        FetchError::NotFound(_) => ApiError::new(request_id, "not_found", error.to_string()),
        FetchError::Transient(_) => {
            tracing::warn!(subject, error = %error, "profile fetch unavailable");
            ApiError::new(request_id, "service_unavailable", error.to_string())
        }
        FetchError::Other(_) => {
            tracing::error!(subject, error = %error, "profile fetch failed");
            ApiError::new(request_id, "internal_error", error.to_string())
        }
    }
}

pub(super) fn map_db_error(request_id: String, error: &DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            REQUEST_ID_HEADER,
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimiter) -> Router<AppState> {
    Router::new()
        .route(
            "/engagement_rate/{username}",
            get(engagement::engagement_rate),
        )
        .route("/scrape/{username}", get(scrape::scrape_profile))
        .route(
            "/top_50_instagram_accounts",
            get(leaderboard::top_accounts),
        )
        .route("/profiles/{username}", get(profiles::get_profile))
        .route(
            "/leaderboards/latest",
            get(leaderboard::latest_leaderboard),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimiter) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}
