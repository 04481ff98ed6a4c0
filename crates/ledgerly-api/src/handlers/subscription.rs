//! Subscription endpoints.

use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use validator::Validate;

use ledgerly_core::error::AppError;

use crate::error::ApiError;
use ledgerly_entity::Tier;
use ledgerly_service::subscription::CancelMode;

use crate::dto::request::{CancelRequest, CheckoutRequest, TierUpdateRequest};
use crate::dto::response::{
    ApiResponse, CancelResponse, CheckoutResponse, StatusResponse, TierUpdateResponse,
};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/subscription/tier
pub async fn update_tier(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<TierUpdateRequest>,
) -> Result<Json<ApiResponse<TierUpdateResponse>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let tier = Tier::from_str(&body.tier)?;

    let record = state
        .subscription_service
        .update_tier(user.context(), tier)
        .await?;

    Ok(Json(ApiResponse::ok(TierUpdateResponse {
        tier: record.tier,
        query_limit: record.query_limit,
        query_count: record.count(),
    })))
}

/// POST /api/subscription/cancel
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CancelRequest>,
) -> Result<Json<ApiResponse<CancelResponse>>, ApiError> {
    let mode = body.mode();
    let subscriptions = state
        .subscription_service
        .cancel(user.context(), mode)
        .await?;

    let message = match mode {
        CancelMode::Immediate => format!(
            "{} subscription(s) canceled; your account is back on the free tier",
            subscriptions.len()
        ),
        CancelMode::PeriodEnd => format!(
            "{} subscription(s) will end when the current billing period runs out",
            subscriptions.len()
        ),
    };

    Ok(Json(ApiResponse::ok(CancelResponse {
        message,
        subscriptions,
    })))
}

/// GET /api/subscription/status
pub async fn status(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    let report = state
        .subscription_service
        .check_status(user.context())
        .await?;

    Ok(Json(ApiResponse::ok(StatusResponse {
        subscriptions: report.subscriptions,
        has_active: report.has_active,
    })))
}

/// POST /api/checkout
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<ApiResponse<CheckoutResponse>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let base = state.config.server.public_url.trim_end_matches('/');
    let session = state
        .subscription_service
        .create_checkout(
            user.context(),
            &body.plan_id,
            format!("{base}/billing/success?session_id={{CHECKOUT_SESSION_ID}}"),
            format!("{base}/billing/canceled"),
        )
        .await?;

    Ok(Json(ApiResponse::ok(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    })))
}
