/// Task REST endpoints
///
/// The unfiltered listing only returns tasks that belong to no project;
/// project tasks are listed under `/projects/{id}/tasks`.

use crate::{
    api::{require_text, ApiError, AppState, Pagination},
    task::{Task, TaskCreate, TaskUpdate},
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

pub fn create_task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task).put(update_task).delete(delete_task))
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.list_unattached(page.skip, page.limit).await?))
}

async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskCreate>,
) -> Result<Json<Task>, ApiError> {
    require_text("title", &payload.title)?;
    if let Some(project_id) = payload.project_id {
        ensure_project(&state, project_id).await?;
    }

    Ok(Json(state.tasks.create(payload).await?))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    state
        .tasks
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    if let Some(title) = &payload.title {
        require_text("title", title)?;
    }
    if let Some(Some(project_id)) = payload.project_id {
        ensure_project(&state, project_id).await?;
    }

    state
        .tasks
        .update(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.tasks.delete(id).await? {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// A task may only reference a project that exists
async fn ensure_project(state: &AppState, project_id: Uuid) -> Result<(), ApiError> {
    if state.projects.exists(project_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("Project not found"))
    }
}
