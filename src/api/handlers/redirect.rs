//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a token to its target URL.
///
/// # Endpoint
///
/// `GET /{token}`
///
/// # Click Tracking
///
/// A click event is queued for the background worker. If the queue is full
/// the click is dropped; the redirect is never delayed.
///
/// # Errors
///
/// Returns 404 Not Found if the token is unknown or expired.
/// Returns 500 if the link table cannot be read.
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target = state.resolve_service.resolve(&token).await?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]))
}
