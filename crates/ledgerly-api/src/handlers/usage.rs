//! Usage endpoints.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;

use crate::dto::response::{ApiResponse, UsageResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/usage
pub async fn get_usage(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UsageResponse>>, ApiError> {
    let record = state.usage_service.current(user.context()).await?;
    Ok(Json(ApiResponse::ok(UsageResponse::from(&record))))
}

/// POST /api/usage/reset
pub async fn reset_usage(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UsageResponse>>, ApiError> {
    let record = state.usage_service.reset(user.context()).await?;
    Ok(Json(ApiResponse::ok(UsageResponse::from(&record))))
}
