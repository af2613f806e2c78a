//! `SQLite` implementation of [`UnitOfWork`] backed by a sqlx transaction.
//!
//! Dropping a [`SqliteUnitOfWork`] without committing rolls the transaction
//! back.

use sqlx::{Sqlite, SqlitePool, Transaction};

use smartmon_app::ports::{UnitOfWork, UnitOfWorkFactory};
use smartmon_domain::assignment::Assignment;
use smartmon_domain::error::MonitorError;
use smartmon_domain::id::{AssignmentId, LabelId};

use crate::error::{StorageError, insert_assignment_error};

const INSERT_ASSIGNMENT: &str =
    "INSERT INTO assignments (name, port, maintainer) VALUES (?, ?, ?)";
const UPDATE_ASSIGNMENT: &str =
    "UPDATE assignments SET name = ?, port = ?, maintainer = ? WHERE id = ?";
const DELETE_ASSIGNMENT: &str = "DELETE FROM assignments WHERE id = ?";
const INSERT_LABEL: &str = "INSERT INTO labels (assignment_id, description) VALUES (?, ?)";
const DELETE_LABELS: &str = "DELETE FROM labels WHERE assignment_id = ?";

/// Opens transactions on a shared pool.
pub struct SqliteUnitOfWorkFactory {
    pool: SqlitePool,
}

impl SqliteUnitOfWorkFactory {
    /// Create a new factory using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UnitOfWorkFactory for SqliteUnitOfWorkFactory {
    type Work = SqliteUnitOfWork;

    async fn begin(&self) -> Result<SqliteUnitOfWork, MonitorError> {
        let tx = self.pool.begin().await.map_err(StorageError::from)?;
        Ok(SqliteUnitOfWork { tx })
    }
}

/// A single open transaction.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork for SqliteUnitOfWork {
    async fn insert_assignment(
        &mut self,
        name: &str,
        port: u16,
        maintainer: Option<&str>,
    ) -> Result<AssignmentId, MonitorError> {
        let result = sqlx::query(INSERT_ASSIGNMENT)
            .bind(name)
            .bind(i64::from(port))
            .bind(maintainer)
            .execute(&mut *self.tx)
            .await
            .map_err(|err| insert_assignment_error(err, name))?;

        Ok(AssignmentId::new(result.last_insert_rowid()))
    }

    async fn update_assignment(&mut self, assignment: &Assignment) -> Result<(), MonitorError> {
        sqlx::query(UPDATE_ASSIGNMENT)
            .bind(&assignment.name)
            .bind(i64::from(assignment.port))
            .bind(assignment.maintainer.as_deref())
            .bind(assignment.id.get())
            .execute(&mut *self.tx)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn delete_assignment(&mut self, id: AssignmentId) -> Result<(), MonitorError> {
        sqlx::query(DELETE_ASSIGNMENT)
            .bind(id.get())
            .execute(&mut *self.tx)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn insert_label(
        &mut self,
        assignment_id: AssignmentId,
        description: &str,
    ) -> Result<LabelId, MonitorError> {
        let result = sqlx::query(INSERT_LABEL)
            .bind(assignment_id.get())
            .bind(description)
            .execute(&mut *self.tx)
            .await
            .map_err(StorageError::from)?;

        Ok(LabelId::new(result.last_insert_rowid()))
    }

    async fn delete_labels(&mut self, assignment_id: AssignmentId) -> Result<(), MonitorError> {
        sqlx::query(DELETE_LABELS)
            .bind(assignment_id.get())
            .execute(&mut *self.tx)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn commit(self) -> Result<(), MonitorError> {
        self.tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), MonitorError> {
        self.tx.rollback().await.map_err(StorageError::from)?;
        Ok(())
    }
}
