//! Core domain entities.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] / [`NewLink`] - A token → target mapping in the link table
//! - [`QuotaDecision`] / [`QuotaStatus`] - A client's request allowance
//! - [`LinkStats`] - Click count for a token

pub mod link;
pub mod quota;
pub mod stats;

pub use link::{Link, NewLink};
pub use quota::{QuotaDecision, QuotaStatus};
pub use stats::LinkStats;
