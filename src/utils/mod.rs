//! Utility functions for token generation, URL processing, and request handling.
//!
//! - [`client_ip`] - Quota key resolution from the request
//! - [`code_generator`] - Token generation and custom token validation
//! - [`time`] - Duration formatting for responses
//! - [`url_normalizer`] - Target URL validation and normalization

pub mod client_ip;
pub mod code_generator;
pub mod time;
pub mod url_normalizer;
