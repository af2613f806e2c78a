//! # smartmon-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository and unit-of-work port traits defined in
//!   `smartmon-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Create the schema on startup (sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `smartmon-app` (for port traits) and `smartmon-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod assignment_repo;
pub mod error;
pub mod label_repo;
pub mod pool;
pub mod unit_of_work;

pub use assignment_repo::SqliteAssignmentRepository;
pub use label_repo::SqliteLabelRepository;
pub use pool::{Config, Database};
pub use unit_of_work::{SqliteUnitOfWork, SqliteUnitOfWorkFactory};
