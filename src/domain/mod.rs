//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions, one per store namespace
//! - [`click_event`] - Click event model
//! - [`click_worker`] - Asynchronous click counting worker
//!
//! # Click Processing Flow
//!
//! 1. The resolution service finds a live link
//! 2. A [`click_event::ClickEvent`] is offered to a bounded channel (dropped if full)
//! 3. [`click_worker::run_click_worker`] increments the token's counter
//! 4. Failures are logged and swallowed; the redirect has already been sent

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
