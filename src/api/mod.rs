/// HTTP API layer
///
/// REST endpoints for projects, tasks, search and the admin bulk transfer.
/// All routes share [`AppState`] and are mounted under `/api` by the server.

// Response error type shared by all handlers
pub mod error;

// Project CRUD and nested task endpoints
pub mod projects;

// Task CRUD endpoints
pub mod tasks;

// CSV export/import and bulk delete
pub mod admin;

// Cross-entity text search
pub mod search;

pub use error::ApiError;

use crate::{project::ProjectRepository, runtime::AccessTracker, task::TaskRepository};
use axum::Router;
use serde::Deserialize;
use sqlx::sqlite::SqlitePool;
use std::path::PathBuf;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pool for whole-database admin operations
    pub pool: SqlitePool,
    pub projects: ProjectRepository,
    pub tasks: TaskRepository,
    /// Background worker refreshing `last_accessed` on reads
    pub tracker: AccessTracker,
    /// Where CSV exports are written
    pub export_dir: PathBuf,
}

impl AppState {
    /// Build the state and start the access tracker (needs a tokio runtime)
    pub fn new(pool: SqlitePool, export_dir: impl Into<PathBuf>) -> Self {
        let projects = ProjectRepository::new(pool.clone());
        let tracker = AccessTracker::spawn(projects.clone());
        Self {
            tasks: TaskRepository::new(pool.clone()),
            projects,
            tracker,
            pool,
            export_dir: export_dir.into(),
        }
    }
}

/// `?skip=&limit=` paging parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// All API routes, unprefixed
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .merge(projects::create_project_routes())
        .merge(tasks::create_task_routes())
        .merge(admin::create_admin_routes())
        .merge(search::create_search_routes())
}

/// Reject blank required text before it reaches a repository
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} must not be empty", field)));
    }
    Ok(())
}
