//! Application state shared across all handlers.

use std::sync::Arc;

use ledgerly_core::config::AppConfig;
use ledgerly_database::DatabasePool;
use ledgerly_service::account::AccountService;
use ledgerly_service::chat::ChatService;
use ledgerly_service::subscription::SubscriptionService;
use ledgerly_service::usage::UsageService;

use crate::auth::SessionDecoder;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped or internally shared for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool, used directly only by the health check.
    pub db: DatabasePool,
    /// Session token decoder.
    pub session_decoder: Arc<SessionDecoder>,
    /// Usage gate and reset.
    pub usage_service: UsageService,
    /// Subscription lifecycle.
    pub subscription_service: SubscriptionService,
    /// Account deletion.
    pub account_service: AccountService,
    /// Chat.
    pub chat_service: ChatService,
}
