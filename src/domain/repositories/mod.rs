//! Repository trait definitions for the domain layer.
//!
//! Each repository owns one namespace of the shared key-value store. Traits
//! are implemented in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for service tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link table (token → target, TTL-bound)
//! - [`QuotaRepository`] - Quota tracker (client → remaining requests)
//! - [`ClickRepository`] - Click counter (token → visits)

pub mod click_repository;
pub mod link_repository;
pub mod quota_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use quota_repository::QuotaRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use quota_repository::MockQuotaRepository;
