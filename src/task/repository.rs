/// SQLite persistence for tasks
///
/// CRUD over the `tasks` table. Lookups of missing rows return `Ok(None)`
/// so the HTTP layer can answer 404 without treating it as a failure.

use crate::{
    patch,
    store::{self, decode_timestamp, decode_uuid, encode_timestamp},
    task::types::{Task, TaskCreate, TaskUpdate},
};
use anyhow::Result;
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    Row,
};
use uuid::Uuid;

pub(crate) const TASK_COLUMNS: &str =
    "id, title, description, completed, created_at, updated_at, project_id";

/// Repository for task rows
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Tasks with no owning project, most recently updated first
    pub async fn list_unattached(&self, skip: u32, limit: u32) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id IS NULL
             ORDER BY updated_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(task_from_row).collect()
    }

    /// Tasks owned by `project_id`, most recently updated first
    pub async fn list_by_project(&self, project_id: Uuid, skip: u32, limit: u32) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?
             ORDER BY updated_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(project_id.to_string())
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(task_from_row).collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(task_from_row).transpose()
    }

    /// Insert a new task with a fresh id and timestamps
    pub async fn create(&self, input: TaskCreate) -> Result<Task> {
        let now = store::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            completed: input.completed,
            created_at: now,
            updated_at: now,
            project_id: input.project_id,
        };

        sqlx::query(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(encode_timestamp(&task.created_at))
        .bind(encode_timestamp(&task.updated_at))
        .bind(task.project_id.map(|id| id.to_string()))
        .execute(&self.pool)
        .await?;

        tracing::debug!("➕ Created task {} ({})", task.id, task.title);
        Ok(task)
    }

    /// Apply the supplied fields of `changes`; `Ok(None)` if the task is gone
    pub async fn update(&self, id: Uuid, changes: TaskUpdate) -> Result<Option<Task>> {
        let Some(mut task) = self.get(id).await? else {
            return Ok(None);
        };

        patch::apply(&mut task.title, changes.title);
        patch::apply(&mut task.description, changes.description);
        patch::apply(&mut task.completed, changes.completed);
        patch::apply(&mut task.project_id, changes.project_id);
        task.updated_at = store::now();

        sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, completed = ?, project_id = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.project_id.map(|id| id.to_string()))
        .bind(encode_timestamp(&task.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(Some(task))
    }

    /// Delete a task; `Ok(false)` when there was nothing to delete
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map a row selected with [`TASK_COLUMNS`] onto a [`Task`]
pub(crate) fn task_from_row(row: &SqliteRow) -> Result<Task> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let project_id: Option<String> = row.try_get("project_id")?;

    Ok(Task {
        id: decode_uuid(&id)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
        project_id: project_id.as_deref().map(decode_uuid).transpose()?,
    })
}
