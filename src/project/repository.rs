/// SQLite persistence for projects
///
/// Projects are loaded together with their tasks using one extra query per
/// call (`project_id IN (...)`) rather than one query per project.

use crate::{
    patch,
    project::types::{Project, ProjectCreate, ProjectUpdate},
    store::{self, decode_timestamp, decode_uuid, encode_timestamp},
    task::{
        repository::{task_from_row, TASK_COLUMNS},
        Task,
    },
};
use anyhow::Result;
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    Row,
};
use std::collections::HashMap;
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "id, name, description, created_at, updated_at, last_accessed";

/// Repository for project rows
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Page of projects, most recently accessed first, tasks embedded
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             ORDER BY last_accessed DESC LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&self.pool)
        .await?;

        let mut projects = rows.iter().map(project_from_row).collect::<Result<Vec<_>>>()?;
        self.attach_tasks(&mut projects).await?;
        Ok(projects)
    }

    /// Fetch a project with its tasks; `Ok(None)` if it does not exist
    pub async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut projects = vec![project_from_row(&row)?];
        self.attach_tasks(&mut projects).await?;
        Ok(projects.pop())
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Insert a new project; all three timestamps start at the same instant
    pub async fn create(&self, input: ProjectCreate) -> Result<Project> {
        let now = store::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
            last_accessed: now,
            tasks: Vec::new(),
        };

        sqlx::query(&format!(
            "INSERT INTO projects ({PROJECT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
        ))
        .bind(project.id.to_string())
        .bind(&project.name)
        .bind(&project.description)
        .bind(encode_timestamp(&project.created_at))
        .bind(encode_timestamp(&project.updated_at))
        .bind(encode_timestamp(&project.last_accessed))
        .execute(&self.pool)
        .await?;

        tracing::debug!("➕ Created project {} ({})", project.id, project.name);
        Ok(project)
    }

    /// Apply the supplied fields of `changes`; `Ok(None)` if the project is gone
    pub async fn update(&self, id: Uuid, changes: ProjectUpdate) -> Result<Option<Project>> {
        let Some(mut project) = self.get(id).await? else {
            return Ok(None);
        };

        patch::apply(&mut project.name, changes.name);
        patch::apply(&mut project.description, changes.description);
        project.updated_at = store::now();

        sqlx::query("UPDATE projects SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&project.name)
            .bind(&project.description)
            .bind(encode_timestamp(&project.updated_at))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(Some(project))
    }

    /// Delete a project and, through the foreign key cascade, its tasks
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record an access. Never moves `last_accessed` backwards and leaves
    /// `updated_at` alone.
    pub async fn touch(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE projects SET last_accessed = max(last_accessed, ?) WHERE id = ?")
            .bind(encode_timestamp(&store::now()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Load the tasks of every project in `projects` with a single query
    async fn attach_tasks(&self, projects: &mut [Project]) -> Result<()> {
        if projects.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; projects.len()].join(", ");
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id IN ({placeholders})
             ORDER BY updated_at DESC"
        );
        let mut query = sqlx::query(&sql);
        for project in projects.iter() {
            query = query.bind(project.id.to_string());
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut by_project: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for row in &rows {
            let task = task_from_row(row)?;
            if let Some(project_id) = task.project_id {
                by_project.entry(project_id).or_default().push(task);
            }
        }

        for project in projects.iter_mut() {
            project.tasks = by_project.remove(&project.id).unwrap_or_default();
        }

        Ok(())
    }
}

fn project_from_row(row: &SqliteRow) -> Result<Project> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let last_accessed: String = row.try_get("last_accessed")?;

    Ok(Project {
        id: decode_uuid(&id)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
        last_accessed: decode_timestamp(&last_accessed)?,
        tasks: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::Database,
        task::{TaskCreate, TaskRepository},
    };

    async fn repositories() -> (ProjectRepository, TaskRepository) {
        let db = Database::open_in_memory().await.unwrap();
        (
            ProjectRepository::new(db.pool().clone()),
            TaskRepository::new(db.pool().clone()),
        )
    }

    #[tokio::test]
    async fn created_project_reads_back_identically() {
        let (projects, _) = repositories().await;
        let created = projects
            .create(ProjectCreate { name: "Launch".into(), description: None })
            .await
            .unwrap();

        let fetched = projects.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.tasks.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_project_cascades_to_its_tasks() {
        let (projects, tasks) = repositories().await;
        let project = projects
            .create(ProjectCreate { name: "Website".into(), description: None })
            .await
            .unwrap();
        let owned = tasks
            .create(TaskCreate {
                title: "Pick a font".into(),
                project_id: Some(project.id),
                ..Default::default()
            })
            .await
            .unwrap();
        let loose = tasks
            .create(TaskCreate { title: "Water plants".into(), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(projects.get(project.id).await.unwrap().unwrap().tasks, vec![owned.clone()]);

        assert!(projects.delete(project.id).await.unwrap());
        assert_eq!(tasks.get(owned.id).await.unwrap(), None);
        assert!(tasks.get(loose.id).await.unwrap().is_some());
        assert!(!projects.delete(project.id).await.unwrap());
    }

    #[tokio::test]
    async fn touch_moves_project_to_front_without_updating_it() {
        let (projects, _) = repositories().await;
        let older = projects
            .create(ProjectCreate { name: "Older".into(), description: None })
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        projects
            .create(ProjectCreate { name: "Newer".into(), description: None })
            .await
            .unwrap();

        assert_eq!(projects.list(0, 100).await.unwrap()[0].name, "Newer");

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        projects.touch(older.id).await.unwrap();

        let listed = projects.list(0, 100).await.unwrap();
        assert_eq!(listed[0].id, older.id);
        assert!(listed[0].last_accessed > older.last_accessed);
        assert_eq!(listed[0].updated_at, older.updated_at);
    }

    #[tokio::test]
    async fn clearing_description_with_explicit_null() {
        let (projects, _) = repositories().await;
        let created = projects
            .create(ProjectCreate { name: "Docs".into(), description: Some("draft".into()) })
            .await
            .unwrap();

        let renamed = projects
            .update(created.id, ProjectUpdate { name: Some("Handbook".into()), description: None })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.description.as_deref(), Some("draft"));

        let cleared = projects
            .update(created.id, ProjectUpdate { name: None, description: Some(None) })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.name, "Handbook");
        assert_eq!(cleared.description, None);
    }
}
