//! REST handlers for the task endpoints. Each one is a direct mapping from
//! HTTP verb + path to a single store operation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use taskboard_core::{NewTask, Task, TaskPatch};
use taskboard_store::TaskStore;

use crate::error::ApiError;

/// Shared state available to all route handlers. The store is chosen at
/// startup and never swapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
}

/// `GET /api/tasks` — all tasks, newest first.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store.list()?))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    match state.store.get(id)? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound),
    }
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    if new.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required"));
    }
    let task = state.store.insert(new)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /api/tasks/{id}` — partial update of any subset of fields.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::Validation("Title is required"));
    }
    match state.store.update(id, patch)? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound),
    }
}

/// `DELETE /api/tasks/{id}` — 204 on success, no body.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    match state.store.delete(id)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::NotFound),
    }
}
