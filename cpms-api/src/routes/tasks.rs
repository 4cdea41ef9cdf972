/// Task endpoints
///
/// Mirrors the project surface: CRUD plus replace-all member assignment
/// views, keyed by task id instead of project id.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    response::{self, Envelope},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use cpms_shared::models::{
    assignment::{Assignment, ParentKind},
    task::{CreateTask, Task, UpdateTask},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Replace-all assignment request body
#[derive(Debug, Deserialize)]
pub struct ReplaceMembersRequest {
    /// Complete new assignment set, in submission order
    pub member_ids: Vec<Uuid>,
}

/// Optional task list filter
#[derive(Debug, Deserialize, Default)]
pub struct TaskListQuery {
    /// Restrict the listing to one project's tasks
    pub project_id: Option<Uuid>,
}

/// Create a new task
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Envelope<Task>>)> {
    req.validate()?;

    let task = Task::create(&state.db, req).await?;

    Ok(response::created(task, "Task created"))
}

/// List tasks, newest first, optionally filtered by project
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Envelope<Vec<Task>>>> {
    let tasks = Task::list(&state.db, query.project_id).await?;

    Ok(response::success(tasks, "Tasks fetched"))
}

/// Partially update a task
///
/// # Errors
///
/// - `400 Bad Request`: no updatable fields in the body
/// - `404 Not Found`: no task with the given id
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Envelope<Task>>> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("No valid fields provided".to_string()));
    }
    req.validate()?;

    let task = Task::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(response::success(task, "Task updated"))
}

/// Delete a task, returning the deleted row
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task = Task::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(response::success(task, "Task deleted"))
}

/// List every task-member assignment across all tasks
pub async fn list_all_task_members(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Assignment>>>> {
    let assignments = Assignment::list_all(&state.db, ParentKind::Task).await?;

    Ok(response::success(assignments, "Task members fetched"))
}

/// List the members assigned to one task
pub async fn list_task_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Vec<Assignment>>>> {
    let assignments = Assignment::list_for_parent(&state.db, ParentKind::Task, id).await?;

    Ok(response::success(assignments, "Task members fetched"))
}

/// Replace the full assignment set for one task
pub async fn replace_task_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplaceMembersRequest>,
) -> ApiResult<Json<Envelope<Vec<Assignment>>>> {
    let assignments =
        Assignment::replace_for_parent(&state.db, ParentKind::Task, id, &req.member_ids).await?;

    Ok(response::success(assignments, "Task members updated"))
}
