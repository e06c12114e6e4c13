//! API server entry point.

use std::sync::Arc;

use integrations::{HttpProductCatalog, HttpStockInventory};
use order_store::PostgresOrderStore;
use ordering::OrderWorkflow;
use sqlx::PgPool;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use api::config::Config;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Connect to the order store and run migrations
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    let store = PostgresOrderStore::new(pool);
    store.run_migrations().await.expect("migrations failed");

    // 4. Collaborator clients with bounded timeouts
    let timeout = config.collaborator_timeout();
    let catalog = HttpProductCatalog::new(config.catalog_service_url.clone(), timeout)
        .expect("failed to build catalog client");
    let inventory = HttpStockInventory::new(config.logistics_service_url.clone(), timeout)
        .expect("failed to build inventory client");

    // 5. Build the application
    let workflow = OrderWorkflow::new(store, catalog, inventory);
    let state = Arc::new(api::AppState { workflow });
    let app = api::create_app(state, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
