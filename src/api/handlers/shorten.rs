//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::PeerAddr;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Creates a short link, charged to the caller's quota.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/page",
///   "custom_short": "promo",   // optional
///   "expiry": 24               // optional, hours
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "shortUrl": "http://localhost:3000/1a2b3c4d",
///   "rate_remaining": 9,
///   "time_remaining": 30
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed body, URL, custom token or expiry
/// - 409 if the custom token is taken
/// - 503 with `rate_limit_reset` (minutes) when the quota is used up
/// - 500 if the client address is unknown or the store fails
pub async fn shorten_handler(
    State(state): State<AppState>,
    PeerAddr(peer): PeerAddr,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid Request Body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let client_ip = resolve_client_ip(&headers, peer, state.behind_proxy);

    let link = state
        .shorten_service
        .shorten(payload.into(), client_ip)
        .await?;

    Ok(Json(link.into()))
}
