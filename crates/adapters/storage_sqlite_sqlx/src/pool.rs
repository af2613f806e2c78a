//! `SQLite` connection pool setup and schema migrations.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Connection settings for the `SQLite` store.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:smartmon.db?mode=rwc` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Open the store described by this configuration.
    ///
    /// The database file is created when missing, foreign keys are enforced,
    /// and pending migrations from `migrations/` are applied before the pool
    /// is handed out.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the connection fails,
    /// or a migration fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(database_url = %self.database_url, "assignment store ready");

        Ok(Database { pool })
    }
}

/// An open, migrated `SQLite` store shared by every repository.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Borrow the shared pool; repositories keep their own clone.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries and close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("assignment store closed");
    }
}
