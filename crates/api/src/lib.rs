//! HTTP API server for the storefront ordering system.
//!
//! Exposes the catalog, order submission, and privileged status updates
//! over REST, with structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::OrderService;
use domain::store::{OrderStore, ProductCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryCatalog, InMemoryOrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, C>(state: Arc<AppState<S, C>>, metrics_handle: PrometheusHandle) -> Router
where
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S, C>))
        .route("/orders", get(routes::orders::list::<S, C>))
        .route("/orders/mine", get(routes::orders::mine::<S, C>))
        .route("/orders/{id}", put(routes::orders::update::<S, C>))
        .route("/products", get(routes::products::list::<S, C>))
        .route("/products", post(routes::products::create::<S, C>))
        .route("/products/{id}", get(routes::products::get::<S, C>))
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

/// Creates the default application state over the in-memory backends.
///
/// The catalog handle is returned alongside the state so callers (main,
/// tests) can seed or inspect it directly.
pub fn create_default_state() -> (
    Arc<AppState<InMemoryOrderStore, InMemoryCatalog>>,
    InMemoryCatalog,
) {
    let store = InMemoryOrderStore::new();
    let catalog = InMemoryCatalog::new();

    let state = Arc::new(AppState {
        order_service: OrderService::new(store, catalog.clone()),
    });

    (state, catalog)
}
