//! # smartmon-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AssignmentRepository`: read assignments by page, name or id
//!   - `LabelRepository`: read labels by description or owning assignment
//!   - `UnitOfWorkFactory` / `UnitOfWork`: transactional writes with
//!     explicit commit and rollback
//! - Define the **driving/inbound port** as a use-case struct:
//!   - `AssignmentService`: list, get, create, update, delete
//! - Keep assignments and their labels consistent without knowing *how*
//!   persistence works
//!
//! ## Dependency rule
//! Depends on `smartmon-domain` only (plus `tokio` for joining futures).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
