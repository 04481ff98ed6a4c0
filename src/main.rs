//! Ledgerly server — AI bookkeeping assistant backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use ledgerly_billing::{BillingClient, PlanCatalog};
use ledgerly_core::config::AppConfig;
use ledgerly_core::error::AppError;
use ledgerly_database::DatabasePool;
use ledgerly_database::repositories::entitlement::EntitlementRepository;
use ledgerly_database::repositories::subscription_event::SubscriptionEventRepository;
use ledgerly_database::repositories::ip_usage::IpUsageRepository;
use ledgerly_database::repositories::usage_analytics::UsageAnalyticsRepository;
use ledgerly_database::store::{EntitlementStore, EventLog, TrialStore, UsageLog};
use ledgerly_identity::IdentityClient;
use ledgerly_service::account::AccountService;
use ledgerly_service::chat::ChatService;
use ledgerly_service::subscription::SubscriptionService;
use ledgerly_service::usage::UsageService;

#[tokio::main]
async fn main() {
    let env = std::env::var("LEDGERLY_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Ledgerly v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    ledgerly_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // Stores.
    let entitlements: Arc<dyn EntitlementStore> =
        Arc::new(EntitlementRepository::new(db.pool().clone()));
    let events: Arc<dyn EventLog> =
        Arc::new(SubscriptionEventRepository::new(db.pool().clone()));
    let usage_log: Arc<dyn UsageLog> =
        Arc::new(UsageAnalyticsRepository::new(db.pool().clone()));
    let trial: Arc<dyn TrialStore> = Arc::new(IpUsageRepository::new(db.pool().clone()));

    // Upstream provider clients.
    let identity = Arc::new(IdentityClient::new(&config.identity)?);
    let billing = Arc::new(BillingClient::new(&config.billing)?);
    let plans = PlanCatalog::new(&config.billing);

    // Services.
    let usage_service = UsageService::new(entitlements.clone());
    let subscription_service = SubscriptionService::new(
        entitlements.clone(),
        events.clone(),
        billing.clone(),
        identity.clone(),
        plans,
    );
    let account_service = AccountService::new(entitlements.clone(), billing, identity);
    let chat_service =
        ChatService::new(usage_service.clone(), usage_log, trial, config.chat.clone());

    let session_decoder = Arc::new(ledgerly_api::auth::SessionDecoder::new(&config.auth));

    let state = ledgerly_api::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        session_decoder,
        usage_service,
        subscription_service,
        account_service,
        chat_service,
    };

    let app = ledgerly_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Ledgerly server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("Ledgerly server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
