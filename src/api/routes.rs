//! API route configuration.

use crate::api::handlers::{health_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Fixed API routes. The `/{token}` catch-all is added by the top-level router.
///
/// # Endpoints
///
/// - `POST /shorten`         - Create a short link (quota-limited)
/// - `GET  /stats/{token}`   - Click statistics for a token
/// - `GET  /health`          - Store and click queue health
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{token}", get(stats_handler))
        .route("/health", get(health_handler))
}
