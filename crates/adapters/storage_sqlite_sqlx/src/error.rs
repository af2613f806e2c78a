//! Storage-specific error type wrapping sqlx errors.

use smartmon_domain::error::{ConflictError, MonitorError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for MonitorError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Map an assignment insert failure, turning a unique-name violation into a
/// [`ConflictError`].
pub(crate) fn insert_assignment_error(err: sqlx::Error, name: &str) -> MonitorError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        tracing::debug!(name, "unique constraint rejected assignment name");
        return ConflictError {
            name: name.to_string(),
        }
        .into();
    }
    StorageError::from(err).into()
}
