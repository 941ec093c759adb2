//! Application error type and its HTTP mapping.

use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::infrastructure::store::StoreError;
use crate::utils::time::whole_minutes;

/// JSON body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// Minutes until the client's quota window resets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset: Option<u64>,
}

/// Errors surfaced by services and handlers.
///
/// Validation and quota errors are expected outcomes and are turned into
/// structured JSON responses. Store errors on primary operations fail the
/// request with `500` and are logged with the operation that failed.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed URL, body, expiry or custom token (`400`).
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// Client quota exhausted for the current window (`503`).
    #[error("rate limit exceeded")]
    RateLimitExceeded { resets_in: Duration },

    /// Unknown or expired token (`404`).
    #[error("{message}")]
    NotFound { message: String },

    /// Requested custom token is already taken (`409`).
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// No rate-limit key could be derived from the request (`500`).
    #[error("{message}")]
    ClientIdentification { message: String },

    /// A primary store operation failed (`500`).
    #[error("store failure during {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// Any other server-side failure (`500`).
    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    /// The fixed response for URLs that fail the shape check.
    pub fn invalid_url() -> Self {
        Self::bad_request("Invalid Request Url", Value::Null)
    }

    pub fn rate_limited(resets_in: Duration) -> Self {
        Self::RateLimitExceeded { resets_in }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn client_identification(message: impl Into<String>) -> Self {
        Self::ClientIdentification {
            message: message.into(),
        }
    }

    pub fn store(operation: &'static str, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::RateLimitExceeded { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::ClientIdentification { .. }
            | AppError::Store { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Invalid Request Body", json!(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut retry_after = None;

        let body = match self {
            AppError::InvalidInput { message, details }
            | AppError::Conflict { message, details } => ErrorBody {
                error: message,
                details: (!details.is_null()).then_some(details),
                rate_limit_reset: None,
            },
            AppError::RateLimitExceeded { resets_in } => {
                retry_after = Some(resets_in.as_secs().max(1));
                ErrorBody {
                    error: "rate limit exceeded".to_string(),
                    details: None,
                    rate_limit_reset: Some(whole_minutes(resets_in)),
                }
            }
            AppError::NotFound { message } | AppError::ClientIdentification { message } => {
                ErrorBody {
                    error: message,
                    details: None,
                    rate_limit_reset: None,
                }
            }
            AppError::Store { operation, source } => {
                tracing::error!(operation, error = %source, "Store operation failed");
                ErrorBody {
                    error: "Internal Server Error".to_string(),
                    details: None,
                    rate_limit_reset: None,
                }
            }
            AppError::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                ErrorBody {
                    error: "Internal Server Error".to_string(),
                    details: None,
                    rate_limit_reset: None,
                }
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::invalid_url().status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::rate_limited(Duration::from_secs(60)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::client_identification("no ip").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::store("link write", StoreError::Connection("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limit_response_headers() {
        let response = AppError::rate_limited(Duration::from_secs(90)).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "90");
    }

    #[test]
    fn test_error_body_skips_empty_fields() {
        let body = ErrorBody {
            error: "Invalid Request Url".to_string(),
            details: None,
            rate_limit_reset: None,
        };

        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "error": "Invalid Request Url" })
        );
    }

    #[test]
    fn test_store_error_display_includes_operation() {
        let err = AppError::store(
            "quota check",
            StoreError::command("EVALSHA", "NOSCRIPT"),
        );
        assert!(err.to_string().contains("quota check"));
    }
}
