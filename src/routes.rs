//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`     - Health check: store and cache (public)
//! - `GET /geo`        - Echo of the validated geo context (diagnostic)
//! - `GET /{link_id}`  - Geo-routed redirect (public)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{geo_handler, health_handler, redirect_handler};
use crate::api::middleware::tracing as request_tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Static routes take precedence over the `/{link_id}` capture, so `health`
/// and `geo` can never be used as link identifiers.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/geo", get(geo_handler))
        .route("/{link_id}", get(redirect_handler))
        .with_state(state)
        .layer(request_tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
