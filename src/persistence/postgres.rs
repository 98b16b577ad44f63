//! PostgreSQL backend.
//!
//! Each operation is a single parameterised statement. A statement that
//! yields no row (or affects none) is reported as `NotFound`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::StorageConfig;
use crate::domain::{RepositoryError, StatusFilter, TodoItem, TodoPayload, TodoRepository};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS todo (
    id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    done BOOLEAN NOT NULL DEFAULT FALSE
)";

const SELECT_ALL: &str =
    "SELECT id, title, content, done FROM todo WHERE ($1::boolean IS NULL OR done = $1)";
const SELECT_ONE: &str = "SELECT id, title, content, done FROM todo WHERE id = $1";
const INSERT: &str =
    "INSERT INTO todo (title, content, done) VALUES ($1, $2, $3) RETURNING id, title, content, done";
const UPDATE: &str = "UPDATE todo SET title = $2, content = $3, done = $4 WHERE id = $1 \
                      RETURNING id, title, content, done";
const DELETE: &str = "DELETE FROM todo WHERE id = $1";

#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id: String,
    title: String,
    content: String,
    done: bool,
}

impl From<TodoRow> for TodoItem {
    fn from(row: TodoRow) -> Self {
        TodoItem {
            id: row.id,
            title: row.title,
            content: row.content,
            done: row.done,
        }
    }
}

/// Todo storage backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// Connect using the configured URL and pool bounds.
    pub async fn connect(config: &StorageConfig) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        tracing::info!(max_connections = config.max_connections, "Database connected");

        let repo = Self { pool };
        if config.ensure_schema {
            repo.ensure_schema().await?;
        }
        Ok(repo)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `todo` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::debug!("Schema ensured");
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find_all(&self, filter: StatusFilter) -> Result<Vec<TodoItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, TodoRow>(SELECT_ALL)
            .bind(filter.as_done())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<TodoItem, RepositoryError> {
        sqlx::query_as::<_, TodoRow>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(TodoItem::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        let row = sqlx::query_as::<_, TodoRow>(INSERT)
            .bind(payload.title)
            .bind(payload.content)
            .bind(payload.done)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::storage)?;
        Ok(row.into())
    }

    async fn update(&self, id: &str, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        sqlx::query_as::<_, TodoRow>(UPDATE)
            .bind(id)
            .bind(payload.title)
            .bind(payload.content)
            .bind(payload.done)
            .fetch_optional(&self.pool)
            .await?
            .map(TodoItem::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        self.pool.close().await;
        tracing::info!("Database connection closed");
        Ok(())
    }
}
