//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::error;

use ledgerly_core::error::AppError;

use crate::error::ApiError;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// An unreachable database makes the whole service unhealthy, reported
/// as 503 so load balancers take the instance out of rotation.
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let latency_ms = state.db.ping().await.map_err(|e| {
        error!(error = %e, "Health check failed");
        AppError::service_unavailable("Database unreachable")
    })?;

    Ok(Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: "connected".to_string(),
        database_latency_ms: latency_ms,
    })))
}
