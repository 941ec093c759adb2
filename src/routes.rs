//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`        - Create a short link
//! - `GET  /stats/{token}`  - Click statistics
//! - `GET  /health`         - Health check: store namespaces, click queue
//! - `GET  /{token}`        - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::redirect_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// All routes with tracing, without path normalization.
///
/// Static routes take precedence over the `/{token}` capture, which is why
/// reserved route names cannot be used as custom tokens.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::api_routes())
        .route("/{token}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}
