//! Health check routes for monitoring and keepalive.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::AppState;

/// Body of the health endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
    /// RFC 3339 server time.
    pub server_time: String,
}

impl HealthResponse {
    fn ok(message: impl Into<String>) -> Self {
        HealthResponse {
            status: "ok",
            message: message.into(),
            server_time: Utc::now().to_rfc3339(),
        }
    }
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok("GeoPrice API is running"))
}

/// `GET /api/health/db`
pub async fn database_health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    if state.db().health_check().await {
        Ok(Json(HealthResponse::ok("Database is reachable")))
    } else {
        Err(ApiError::new(ErrorCode::DatabaseError, "Database is unreachable"))
    }
}
