mod recommendations;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use adwise_engine::{EngineError, Recommender};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub recommender: Arc<Recommender>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn now() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }
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

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::now(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Map pipeline failures to API errors. Persistence failures are deliberately
/// generic in the response body; details go to the log only.
pub(super) fn map_engine_error(error: &EngineError) -> ApiError {
    match error {
        EngineError::EntityNotFound(_) => {
            ApiError::new("not_found", "no entity found for the given id")
        }
        EngineError::EmptyCatalog => ApiError::new(
            "conflict",
            "channel catalog is not seeded; run the seed command first",
        ),
        EngineError::Db(_) | EngineError::Encode(_) => {
            tracing::error!(error = %error, "recommendation run failed");
            ApiError::new("internal_error", "failed to refresh recommendations")
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/entities/{public_id}/recommendation",
            get(recommendations::get_recommendation),
        )
        .route(
            "/api/v1/entities/{public_id}/recommendation/refresh",
            post(recommendations::force_refresh),
        )
        .layer(build_cors())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match adwise_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::new(HealthData {
                status: "ok",
                database: "ok",
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::new(HealthData {
                    status: "degraded",
                    database: "unavailable",
                })),
            )
        }
    }
}
