/// Project endpoints
///
/// CRUD over projects plus the project-member assignment views. Member
/// assignment is replace-all: the submitted id list becomes the complete
/// assignment set for the project.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    response::{self, Envelope},
};
use axum::{extract::State, http::StatusCode};
use cpms_shared::models::{
    assignment::{Assignment, ParentKind},
    project::{CreateProject, Project, UpdateProject},
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

/// Create a new project
///
/// # Endpoint
///
/// ```text
/// POST /api/projects
/// ```
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<Envelope<Project>>)> {
    req.validate()?;

    let project = Project::create(&state.db, req).await?;

    Ok(response::created(project, "Project created"))
}

/// List all projects, newest first
pub async fn list_projects(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Project>>>> {
    let projects = Project::list(&state.db).await?;

    Ok(response::success(projects, "Projects fetched"))
}

/// Partially update a project
///
/// At least one updatable field must be present in the body.
///
/// # Errors
///
/// - `400 Bad Request`: no updatable fields in the body
/// - `404 Not Found`: no project with the given id
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProject>,
) -> ApiResult<Json<Envelope<Project>>> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("No valid fields provided".to_string()));
    }
    req.validate()?;

    let project = Project::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(response::success(project, "Project updated"))
}

/// Delete a project
///
/// Returns the deleted row. Assignments referencing the project are removed
/// by the store.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Project>>> {
    let project = Project::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(response::success(project, "Project deleted"))
}

/// List every project-member assignment across all projects
pub async fn list_all_project_members(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Assignment>>>> {
    let assignments = Assignment::list_all(&state.db, ParentKind::Project).await?;

    Ok(response::success(assignments, "Project members fetched"))
}

/// List the members assigned to one project
pub async fn list_project_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Vec<Assignment>>>> {
    let assignments = Assignment::list_for_parent(&state.db, ParentKind::Project, id).await?;

    Ok(response::success(assignments, "Project members fetched"))
}

/// Replace the full assignment set for one project
///
/// The submitted list becomes the project's complete set of assigned
/// members. An empty list clears all assignments. The swap is atomic, so
/// concurrent readers see either the old set or the new one.
pub async fn replace_project_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplaceMembersRequest>,
) -> ApiResult<Json<Envelope<Vec<Assignment>>>> {
    let assignments =
        Assignment::replace_for_parent(&state.db, ParentKind::Project, id, &req.member_ids)
            .await?;

    Ok(response::success(assignments, "Project members updated"))
}
