//! Route definitions for the Ledgerly HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ledgerly_core::config::app::CorsConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes as usize;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(usage_routes())
        .merge(subscription_routes())
        .merge(account_routes())
        .merge(chat_routes())
        .merge(webhook_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn usage_routes() -> Router<AppState> {
    Router::new()
        .route("/usage", get(handlers::usage::get_usage))
        .route("/usage/reset", post(handlers::usage::reset_usage))
}

fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscription/tier",
            post(handlers::subscription::update_tier),
        )
        .route("/subscription/cancel", post(handlers::subscription::cancel))
        .route("/subscription/status", get(handlers::subscription::status))
        .route("/checkout", post(handlers::subscription::checkout))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account/delete", post(handlers::account::delete_account))
        .route(
            "/account/deletion-info",
            get(handlers::account::deletion_info),
        )
}

fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat", post(handlers::chat::chat))
}

fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhook/billing", post(handlers::webhook::billing_webhook))
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    use tower_http::cors::{AllowOrigin, Any};

    let mut cors = CorsLayer::new();

    if config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(AllowOrigin::list(origins));
    }

    if config.allowed_methods.contains(&"*".to_string()) {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<axum::http::Method> = config
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<axum::http::HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors.max_age(std::time::Duration::from_secs(config.max_age_seconds))
}
