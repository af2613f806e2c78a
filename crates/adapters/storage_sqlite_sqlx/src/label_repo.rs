//! `SQLite` implementation of [`LabelRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smartmon_app::ports::LabelRepository;
use smartmon_domain::error::MonitorError;
use smartmon_domain::id::{AssignmentId, LabelId};
use smartmon_domain::label::Label;

use crate::error::StorageError;

struct Wrapper(Label);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let assignment_id: i64 = row.try_get("assignment_id")?;
        let description: String = row.try_get("description")?;

        Ok(Self(Label {
            id: LabelId::new(id),
            assignment_id: AssignmentId::new(assignment_id),
            description,
        }))
    }
}

const SELECT_ALL: &str = "SELECT * FROM labels ORDER BY id";
const SELECT_BY_DESCRIPTION: &str = "SELECT * FROM labels WHERE description = ? ORDER BY id";
const SELECT_BY_ASSIGNMENT: &str = "SELECT * FROM labels WHERE assignment_id = ? ORDER BY id";

/// `SQLite`-backed label repository.
pub struct SqliteLabelRepository {
    pool: SqlitePool,
}

impl SqliteLabelRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl LabelRepository for SqliteLabelRepository {
    async fn get_all(&self) -> Result<Vec<Label>, MonitorError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_description(&self, description: &str) -> Result<Vec<Label>, MonitorError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_DESCRIPTION)
            .bind(description)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_assignment_id(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Label>, MonitorError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ASSIGNMENT)
            .bind(assignment_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
