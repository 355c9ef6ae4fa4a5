//! Recommendation endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use adwise_engine::RecommendationBundle;

use super::{map_engine_error, ApiError, ApiResponse, AppState};

/// `GET /api/v1/entities/{public_id}/recommendation`
///
/// Staleness-aware: a run from the last thirty minutes is served as-is.
pub(super) async fn get_recommendation(
    State(state): State<AppState>,
    Path(public_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecommendationBundle>>, ApiError> {
    let bundle = state
        .recommender
        .recommend(public_id, false)
        .await
        .map_err(|e| map_engine_error(&e))?;
    Ok(Json(ApiResponse::new(bundle)))
}

/// `POST /api/v1/entities/{public_id}/recommendation/refresh`
///
/// Bypasses the staleness check and always appends a fresh run.
pub(super) async fn force_refresh(
    State(state): State<AppState>,
    Path(public_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecommendationBundle>>, ApiError> {
    let bundle = state
        .recommender
        .recommend(public_id, true)
        .await
        .map_err(|e| map_engine_error(&e))?;
    Ok(Json(ApiResponse::new(bundle)))
}
