//! SQLite implementation of [`TaskStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature.  Migrations are run inside
//! [`SqliteStore::connect`], before the HTTP listener binds.
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path **at compile time**
//! relative to `CARGO_MANIFEST_DIR` (the crate root), so the directory is
//! embedded into the binary.  The database file location is determined at
//! runtime by the `TASKDECK_DATABASE_URL` environment variable and is **not**
//! related to the current working directory at runtime.
//!
//! # Queries
//!
//! The `sqlx::query` (runtime-verified) form is used deliberately so that no
//! `DATABASE_URL` environment variable is needed at compile time.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{Task, TaskPatch, TaskStore};

/// SQLite-backed task store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://taskdeck.db"` or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // Each `:memory:` connection is a distinct database, so a larger
        // pool would hand callers different empty databases.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

type TaskRow = (String, String, bool, String, String);

fn from_row((id, title, completed, created_at, updated_at): TaskRow) -> Task {
    Task {
        id,
        title,
        completed,
        created_at: parse_ts("created_at", &created_at),
        updated_at: parse_ts("updated_at", &updated_at),
    }
}

fn parse_ts(field: &'static str, raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap_or_else(|e: chrono::ParseError| {
        tracing::warn!(field, raw, error = %e, "failed to parse stored timestamp; using now");
        Utc::now()
    })
}

impl TaskStore for SqliteStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, sqlx::Error> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, title, completed, created_at, updated_at \
             FROM tasks ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn insert_task(&self, title: &str) -> Result<Task, sqlx::Error> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_owned(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO tasks (id, title, completed, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(task.completed)
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(task)
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, sqlx::Error> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, title, completed, created_at, updated_at \
             FROM tasks WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(from_row))
    }

    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>, sqlx::Error> {
        // COALESCE keeps the stored value for every absent patch field, so
        // an explicit `completed = false` still lands as a real write.
        let updated_at = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE tasks SET \
                 title = COALESCE(?1, title), \
                 completed = COALESCE(?2, completed), \
                 updated_at = ?3 \
             WHERE id = ?4",
        )
        .bind(&patch.title)
        .bind(patch.completed)
        .bind(&updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_task(id).await
    }

    async fn delete_task(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
