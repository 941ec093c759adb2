//! Repository implementations over key-value store namespaces.
//!
//! # Repositories
//!
//! - [`KvLinkRepository`] - Link table
//! - [`KvQuotaRepository`] - Quota tracker
//! - [`KvClickRepository`] - Click counter

pub mod kv_click_repository;
pub mod kv_link_repository;
pub mod kv_quota_repository;

pub use kv_click_repository::KvClickRepository;
pub use kv_link_repository::KvLinkRepository;
pub use kv_quota_repository::KvQuotaRepository;
