//! # smartmon-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/services` (list, filter by label, get,
//!   create, update, delete)
//! - Parse and validate request payloads before they reach the application
//!   service (driving adapter)
//! - Map every [`MonitorError`](smartmon_domain::error::MonitorError) variant
//!   to a status code and a `{"message": …}` body
//!
//! ## Dependency rule
//! Depends on `smartmon-app` (for port traits and services) and `smartmon-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
