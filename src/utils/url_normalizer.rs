//! Target URL validation and normalization.
//!
//! A target is accepted when it has the shape
//! `[http(s)://]host.tld[:port][/path]`: an optional scheme, a host with at
//! least one dot-separated label and an alphabetic TLD, an optional port and
//! an optional path. Control characters are rejected anywhere in the target
//! because the stored value is sent back verbatim as a `Location` header.

use regex::Regex;
use std::sync::LazyLock;

/// Shape check for target URLs.
static TARGET_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}(:\d+)?(/.*)?$").unwrap()
});

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL does not look like [http(s)://]host.tld[:port][/path]")]
    InvalidShape,

    #[error("URL contains control characters")]
    ControlCharacter,
}

/// Returns true if `raw` passes the target URL shape check.
pub fn is_valid_target(raw: &str) -> bool {
    !raw.chars().any(char::is_control) && TARGET_URL_REGEX.is_match(raw)
}

/// Validates a target URL and returns the form stored in the link table.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Targets with control characters are refused
/// 3. The shape check is applied
/// 4. A missing scheme becomes `http://`, so redirects are always absolute
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input,
/// [`UrlNormalizationError::ControlCharacter`] for targets that could not be
/// written as a header, and [`UrlNormalizationError::InvalidShape`] when the
/// shape check fails.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com/page").unwrap(), "http://example.com/page");
/// assert_eq!(normalize_url("https://example.com").unwrap(), "https://example.com");
/// assert!(normalize_url("localhost").is_err());
/// ```
pub fn normalize_url(raw: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(UrlNormalizationError::ControlCharacter);
    }

    if !is_valid_target(trimmed) {
        return Err(UrlNormalizationError::InvalidShape);
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("http://{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_urls() {
        assert!(is_valid_target("https://example.com/page"));
        assert!(is_valid_target("http://sub.example.co.uk"));
        assert!(is_valid_target("https://example.com:8080/a/b?c=d#e"));
        assert!(is_valid_target("https://my-site.io/"));
    }

    #[test]
    fn test_accepts_scheme_less_urls() {
        assert!(is_valid_target("example.com"));
        assert!(is_valid_target("www.example.com/path"));
    }

    #[test]
    fn test_rejects_invalid_shapes() {
        assert!(!is_valid_target("not-a-url"));
        assert!(!is_valid_target("localhost:3000"));
        assert!(!is_valid_target("ftp://example.com"));
        assert!(!is_valid_target("https://example.c"));
        assert!(!is_valid_target("https://exa mple.com"));
        assert!(!is_valid_target("javascript:alert(1)"));
        assert!(!is_valid_target("https://192.168.0.1"));
    }

    #[test]
    fn test_normalize_keeps_scheme() {
        assert_eq!(
            normalize_url("https://example.com/page").unwrap(),
            "https://example.com/page"
        );
        assert_eq!(
            normalize_url("http://example.com").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_normalize_adds_missing_scheme() {
        assert_eq!(
            normalize_url("example.com/page").unwrap(),
            "http://example.com/page"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://example.com  ").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_errors() {
        assert_eq!(normalize_url("   "), Err(UrlNormalizationError::Empty));
        assert_eq!(
            normalize_url("not-a-url"),
            Err(UrlNormalizationError::InvalidShape)
        );
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(!is_valid_target("https://example.com/a\u{1}b"));
        assert!(!is_valid_target("https://example.com/a\rb"));
        assert!(!is_valid_target("https://example.com/a\u{7f}"));
        assert_eq!(
            normalize_url("https://example.com/a\u{1}b"),
            Err(UrlNormalizationError::ControlCharacter)
        );
        assert_eq!(
            normalize_url("https://example.com/line\r\nSet-Cookie: x=1"),
            Err(UrlNormalizationError::ControlCharacter)
        );
    }

    #[test]
    fn test_normalized_target_is_a_valid_location() {
        let target = normalize_url("example.com/caf\u{e9}?q=1").unwrap();
        assert!(axum::http::HeaderValue::try_from(target).is_ok());
    }
}
