//! Database abstraction layer.
//!
//! [`TaskStore`] defines the interface for persisting task records.  The
//! default implementation is [`sqlite::SqliteStore`].  To swap to another
//! database, implement [`TaskStore`] for your new type and change the
//! concrete type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures (stable since Rust
//! 1.75) so no extra `async-trait` crate is required.

pub mod sqlite;

use std::future::Future;

use chrono::{DateTime, Utc};

/// A row in the `tasks` table.
#[derive(Debug, Clone)]
pub struct Task {
    /// Server-assigned UUID, stable for the record's lifetime.
    pub id: String,
    /// Human-readable label; never empty once created.
    pub title: String,
    /// Completion flag; `false` at creation.
    pub completed: bool,
    /// Set once at insertion, never changed; the sole listing sort key.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to an existing task.
///
/// Each field is independently optional: `None` keeps the stored value,
/// while `Some(false)` for `completed` is a real write.  Representing the
/// patch this way is what lets an explicit `completed: false` flip a
/// finished task back instead of being swallowed by a truthiness check.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// Trait for persisting task records.
pub trait TaskStore: Send + Sync + 'static {
    /// All tasks, newest first (`created_at` descending, `id` tie-break).
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, sqlx::Error>> + Send;

    /// Insert a new task with a fresh id, `completed = false`, and both
    /// timestamps set to now.  Returns the created record.
    ///
    /// The store does not validate `title`; non-emptiness is an API-boundary
    /// concern.
    fn insert_task(&self, title: &str)
        -> impl Future<Output = Result<Task, sqlx::Error>> + Send;

    /// Retrieve a single task, or `None` if the id is unknown.
    fn get_task(&self, id: &str)
        -> impl Future<Output = Result<Option<Task>, sqlx::Error>> + Send;

    /// Apply `patch` to the task with `id`, refreshing `updated_at`.
    /// Returns the updated record, or `None` if the id is unknown.
    fn update_task(
        &self,
        id: &str,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Option<Task>, sqlx::Error>> + Send;

    /// Permanently remove a task.  Returns `false` if the id was unknown.
    fn delete_task(&self, id: &str)
        -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}
