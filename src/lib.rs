//! # URL Redirector
//!
//! A URL shortener backed by a Redis-compatible key-value store, with
//! per-client creation quotas and best-effort click counting.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository traits and the click worker
//! - **Application Layer** ([`application`]) - Shortening, resolution and statistics
//! - **Infrastructure Layer** ([`infrastructure`]) - Store namespaces and repository implementations
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Store Layout
//!
//! One store instance, three logical databases:
//!
//! - `LINK_DB` (0) - token → target URL, expires with the link
//! - `QUOTA_DB` (1) - client IP → remaining requests, expires with the quota window
//! - `CLICK_DB` (2) - token → click count, never expires
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_ADDR="127.0.0.1:6379"
//! export DOMAIN="https://s.example.com"
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        ResolveService, ShortenLink, ShortenService, ShortenedLink, StatsService,
    };
    pub use crate::config::ShortenerSettings;
    pub use crate::domain::entities::{Link, LinkStats, NewLink, QuotaDecision};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{KeyValueStore, StoreNamespaces};
    pub use crate::state::AppState;
}
