//! `SQLite` implementation of [`AssignmentRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smartmon_app::ports::AssignmentRepository;
use smartmon_domain::assignment::Assignment;
use smartmon_domain::error::MonitorError;
use smartmon_domain::id::AssignmentId;
use smartmon_domain::page::Page;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Assignment`].
struct Wrapper(Assignment);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Assignment> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let port: i64 = row.try_get("port")?;
        let maintainer: Option<String> = row.try_get("maintainer")?;

        let port = u16::try_from(port).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Assignment {
            id: AssignmentId::new(id),
            name,
            port,
            maintainer,
        }))
    }
}

const SELECT_PAGE: &str = "SELECT * FROM assignments ORDER BY id LIMIT ? OFFSET ?";
const SELECT_BY_NAME: &str = "SELECT * FROM assignments WHERE name = ?";
const SELECT_BY_ID: &str = "SELECT * FROM assignments WHERE id = ?";

/// `SQLite`-backed assignment repository.
pub struct SqliteAssignmentRepository {
    pool: SqlitePool,
}

impl SqliteAssignmentRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AssignmentRepository for SqliteAssignmentRepository {
    async fn get_page(&self, page: Page) -> Result<Vec<Assignment>, MonitorError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Assignment>, MonitorError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_id(&self, id: AssignmentId) -> Result<Option<Assignment>, MonitorError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteAssignmentRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteAssignmentRepository::new(db.pool().clone())
    }

    async fn seed(repo: &SqliteAssignmentRepository, name: &str, port: i64) -> AssignmentId {
        let result = sqlx::query("INSERT INTO assignments (name, port, maintainer) VALUES (?, ?, ?)")
            .bind(name)
            .bind(port)
            .bind("test@test.com")
            .execute(&repo.pool)
            .await
            .unwrap();
        AssignmentId::new(result.last_insert_rowid())
    }

    #[tokio::test]
    async fn should_retrieve_assignment_by_name_and_id() {
        let repo = setup().await;
        let id = seed(&repo, "test", 1111).await;

        let by_name = repo.get_by_name("test").await.unwrap().unwrap();
        assert_eq!(by_name.id, id);
        assert_eq!(by_name.port, 1111);
        assert_eq!(by_name.maintainer.as_deref(), Some("test@test.com"));

        let by_id = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(by_id, by_name);
    }

    #[tokio::test]
    async fn should_return_none_when_assignment_not_found() {
        let repo = setup().await;
        assert!(repo.get_by_name("ghost").await.unwrap().is_none());
        assert!(repo.get_by_id(AssignmentId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_page_through_assignments_in_insertion_order() {
        let repo = setup().await;
        for (name, port) in [("alpha", 1), ("bravo", 2), ("charlie", 3)] {
            seed(&repo, name, port).await;
        }

        let first = repo.get_page(Page::new(2, 1).unwrap()).await.unwrap();
        let names: Vec<&str> = first.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "bravo"]);

        let second = repo.get_page(Page::new(2, 2).unwrap()).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "charlie");

        let beyond = repo.get_page(Page::new(2, 3).unwrap()).await.unwrap();
        assert!(beyond.is_empty());
    }
}
