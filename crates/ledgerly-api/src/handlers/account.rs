//! Account endpoints.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use ledgerly_entity::account::DeletionReceipt;
use ledgerly_service::account::DeletionPreview;

use crate::dto::request::AccountDeleteRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/account/delete
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<AccountDeleteRequest>,
) -> Result<Json<ApiResponse<DeletionReceipt>>, ApiError> {
    let receipt = state
        .account_service
        .delete(user.context(), body.confirm_deletion, body.export_data)
        .await?;
    Ok(Json(ApiResponse::ok(receipt)))
}

/// GET /api/account/deletion-info
pub async fn deletion_info(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<DeletionPreview>>, ApiError> {
    let preview = state.account_service.deletion_info(user.context()).await?;
    Ok(Json(ApiResponse::ok(preview)))
}
