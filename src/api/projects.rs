/// Project REST endpoints
///
/// CRUD for projects plus the nested `/projects/{id}/tasks` collection.
/// Reads hand the project id to the access tracker after loading it.

use crate::{
    api::{require_text, ApiError, AppState, Pagination},
    project::{Project, ProjectCreate, ProjectUpdate},
    task::{Task, TaskCreate},
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(
            "/projects/{id}/tasks",
            get(list_project_tasks).post(create_project_task),
        )
        .route(
            "/projects/{id}/tasks/",
            get(list_project_tasks).post(create_project_task),
        )
}

/// GET /projects/?skip=&limit=
async fn list_projects(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects.list(page.skip, page.limit).await?))
}

/// POST /projects/
/// Body: { "name": "...", "description": "..." }
async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<ProjectCreate>,
) -> Result<Json<Project>, ApiError> {
    require_text("name", &payload.name)?;

    let project = state.projects.create(payload).await?;
    tracing::info!("📁 Created project: {} ({})", project.id, project.name);
    Ok(Json(project))
}

/// GET /projects/{id}
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let project = state
        .projects
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    state.tracker.record(id);
    Ok(Json(project))
}

/// PUT /projects/{id}
/// Body: any subset of { "name", "description" }
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<Project>, ApiError> {
    if let Some(name) = &payload.name {
        require_text("name", name)?;
    }

    state
        .projects
        .update(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project not found"))
}

/// DELETE /projects/{id}
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.projects.delete(id).await? {
        return Err(ApiError::not_found("Project not found"));
    }

    tracing::info!("🗑️ Deleted project {} and its tasks", id);
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

/// GET /projects/{id}/tasks?skip=&limit=
async fn list_project_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Task>>, ApiError> {
    if !state.projects.exists(id).await? {
        return Err(ApiError::not_found("Project not found"));
    }

    state.tracker.record(id);
    Ok(Json(state.tasks.list_by_project(id, page.skip, page.limit).await?))
}

/// POST /projects/{id}/tasks
/// Body: task fields; any `project_id` in the body is replaced by the path id
async fn create_project_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<TaskCreate>,
) -> Result<Json<Task>, ApiError> {
    require_text("title", &payload.title)?;
    if !state.projects.exists(id).await? {
        return Err(ApiError::not_found("Project not found"));
    }

    payload.project_id = Some(id);
    Ok(Json(state.tasks.create(payload).await?))
}
