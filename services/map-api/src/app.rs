//! Router construction.

use axum::{routing::get, Extension, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Every route of the service. `/metrics` is empty without a handle.
pub fn router(state: Arc<AppState>, prometheus: Option<PrometheusHandle>) -> Router {
    let app = Router::new()
        // Pages
        .route("/", get(handlers::pages::index_handler))
        .route("/modules/:name", get(handlers::pages::module_page_handler))
        // JSON API
        .route("/api/modules", get(handlers::modules::list_modules_handler))
        .route(
            "/api/modules/:name",
            get(handlers::modules::module_view_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state));

    let app = match prometheus {
        Some(handle) => app.layer(Extension(handle)),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
