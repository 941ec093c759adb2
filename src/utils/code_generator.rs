//! Short token generation and validation utilities.
//!
//! Generated tokens are 8 lowercase hex characters taken from OS randomness.
//! Custom tokens supplied by clients are checked against a small rule set so
//! they cannot shadow fixed routes.

use crate::error::AppError;
use serde_json::json;

/// Length of a generated token.
pub const TOKEN_LENGTH: usize = 8;

/// Random bytes consumed per token (two hex characters each).
const TOKEN_BYTES: usize = TOKEN_LENGTH / 2;

const CUSTOM_MIN_LENGTH: usize = 4;
const CUSTOM_MAX_LENGTH: usize = 32;

/// Tokens that would collide with fixed routes.
const RESERVED_TOKENS: &[&str] = &["health", "shorten", "stats", "api"];

/// Generates a random 8-character token from the alphabet `[0-9a-f]`.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let token = generate_token()?;
/// assert_eq!(token.len(), 8);
/// assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn generate_token() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_BYTES];

    getrandom::fill(&mut buffer)
        .map_err(|e| AppError::internal(format!("Failed to generate random bytes: {}", e)))?;

    Ok(hex::encode(buffer))
}

/// Validates a client-supplied custom token.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if any rule is violated.
pub fn validate_custom_token(token: &str) -> Result<(), AppError> {
    if !(CUSTOM_MIN_LENGTH..=CUSTOM_MAX_LENGTH).contains(&token.len()) {
        return Err(AppError::bad_request(
            "Custom short must be 4-32 characters",
            json!({ "provided_length": token.len() }),
        ));
    }

    if !token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom short can only contain letters, digits, hyphens and underscores",
            json!({ "custom_short": token }),
        ));
    }

    if token.starts_with('-') || token.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom short cannot start or end with a hyphen",
            json!({ "custom_short": token }),
        ));
    }

    if RESERVED_TOKENS.contains(&token.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            "This short is reserved",
            json!({ "custom_short": token }),
        ));
    }

    Ok(())
}
