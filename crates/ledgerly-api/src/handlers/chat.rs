//! Chat endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::Validate;

use ledgerly_core::error::AppError;

use crate::error::ApiError;
use ledgerly_service::chat::{ChatOutcome, ChatRequest};

use crate::dto::request::ChatMessageRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::{ClientKey, MaybeAuthUser};
use crate::state::AppState;

/// POST /api/chat
///
/// Signed-in callers go through their entitlement gate; callers without a
/// session get the anonymous trial allowance, counted per client key. A
/// gate denial is not an error in the domain sense but maps to 429 on the
/// wire, with the limit details in the body.
pub async fn chat(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    client: ClientKey,
    Json(body): Json<ChatMessageRequest>,
) -> Result<Response, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let request = ChatRequest {
        message: body.message,
        conversation_id: body.conversation_id,
        model: body.model,
    };

    let outcome = match &user.0 {
        Some(ctx) => state.chat_service.chat(ctx, request).await?,
        None => state.chat_service.chat_anonymous(&client.0, request).await?,
    };

    let response = match outcome {
        ChatOutcome::Reply(reply) => Json(ApiResponse::ok(reply)).into_response(),
        ChatOutcome::Denied {
            query_limit,
            remaining,
        } => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "RATE_LIMITED",
                "message": "Query limit reached for this cycle",
                "limit": query_limit,
                "remaining": remaining,
            })),
        )
            .into_response(),
    };
    Ok(response)
}
