//! HTTP API server for the sales order service.
//!
//! Exposes order CRUD over the reconciliation workflow, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use integrations::{ProductCatalog, StockInventory};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{CustomerStore, OrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, C, I>(
    state: Arc<AppState<S, C, I>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: OrderStore + CustomerStore + 'static,
    C: ProductCatalog + 'static,
    I: StockInventory + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            get(routes::orders::list::<S, C, I>).post(routes::orders::create::<S, C, I>),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get::<S, C, I>)
                .patch(routes::orders::update::<S, C, I>)
                .delete(routes::orders::delete::<S, C, I>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
