//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and quota rules, and
//! provide the API used by HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Quota-checked link creation
//! - [`services::resolve_service::ResolveService`] - Token lookup and click queueing
//! - [`services::stats_service::StatsService`] - Per-token click statistics

pub mod services;
