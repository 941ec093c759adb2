//! Handler for per-token statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click count and link state for a token.
///
/// # Endpoint
///
/// `GET /stats/{token}`
///
/// # Response
///
/// ```json
/// {
///   "token": "1a2b3c4d",
///   "clicks": 42,
///   "active": true,
///   "expires_in_seconds": 3540
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the token has no live link and no clicks.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.stats(&token).await?;

    Ok(Json(stats.into()))
}
