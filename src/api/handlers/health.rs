//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::infrastructure::store::KeyValueStore;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Link table, quota tracker and click queue are usable.
///   A failing click counter only marks the service `degraded`.
/// - **503 Service Unavailable**: A primary component is down
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "link_store": { "status": "ok", "message": "Reachable" },
///     "quota_store": { "status": "ok", "message": "Reachable" },
///     "click_store": { "status": "ok", "message": "Reachable" },
///     "click_queue": { "status": "ok", "message": "Capacity: 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (link_store, quota_store, click_store) = tokio::join!(
        check_store(state.stores.links.as_ref()),
        check_store(state.stores.quotas.as_ref()),
        check_store(state.stores.clicks.as_ref()),
    );
    let click_queue = check_click_queue(&state);

    let primary_ok = link_store.is_ok() && quota_store.is_ok() && click_queue.is_ok();
    let status = match (primary_ok, click_store.is_ok()) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            link_store,
            quota_store,
            click_store,
            click_queue,
        },
    };

    if primary_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks one namespace via PING.
async fn check_store(store: &dyn KeyValueStore) -> CheckStatus {
    match store.ping().await {
        Ok(()) => CheckStatus::ok("Reachable"),
        Err(e) => CheckStatus::error(format!("Store error: {}", e)),
    }
}

/// Checks if the click tracking queue is operational.
fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.click_sender.capacity()))
    }
}
