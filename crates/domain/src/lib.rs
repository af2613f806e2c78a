//! # smartmon-domain
//!
//! Pure domain model for the smartmon monitoring-assignment registry.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, pagination
//! - Define **Assignments** (named network endpoints with a port and maintainer)
//! - Define **Labels** (free-text tags owned by an assignment)
//! - Define the **View** returned to callers (an assignment joined with its labels)
//! - Contain all field validation rules
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod page;

pub mod assignment;
pub mod label;
pub mod view;
