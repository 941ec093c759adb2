//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Key-value store namespaces (Redis, in-memory, no-op)
//! - [`persistence`] - Repository implementations over those namespaces

pub mod persistence;
pub mod store;
