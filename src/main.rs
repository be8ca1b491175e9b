//! Ledger API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use ledger_api::api::create_router;
use ledger_api::infrastructure::{AppConfig, AppDependencies};
use ledger_api::store::{InMemoryLedgerStore, LedgerStore, PgLedgerStore};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ledger_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ledger API server...");

    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => {
            tracing::info!(
                "Configuration loaded: host={}, port={}",
                config.app_host,
                config.app_port
            );
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load configuration from environment: {e}");
            tracing::info!("Using default configuration");
            AppConfig::default()
        }
    };

    let bind_address = format!("{}:{}", config.app_host, config.app_port);

    // Select the store backend: Postgres when a DATABASE_URL is configured,
    // in-memory otherwise
    let store: Arc<dyn LedgerStore> = match &config.database_url {
        Some(database_url) => {
            let store = match PgLedgerStore::connect(database_url).await {
                Ok(store) => store,
                Err(e) => {
                    tracing::error!("Failed to connect to Postgres: {e}");
                    std::process::exit(1);
                }
            };
            tracing::info!("Store initialized (Postgres)");
            Arc::new(store)
        }
        None => {
            tracing::info!("Store initialized (in-memory mode)");
            Arc::new(InMemoryLedgerStore::new())
        }
    };

    // Create dependencies container
    let deps = AppDependencies::new(config, store);

    // Create router with middleware
    let app = create_router(deps).layer(TraceLayer::new_for_http());

    // Start server
    let listener = TcpListener::bind(&bind_address).await.unwrap();
    tracing::info!("Ledger API server started on http://{bind_address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .unwrap();

    tracing::info!("Ledger API server stopped");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received");
}
