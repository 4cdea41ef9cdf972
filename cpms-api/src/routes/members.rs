/// Member directory endpoints
///
/// Members are the people who can be assigned to projects and tasks.
/// Deleting a member also removes their assignments via the store's
/// cascading foreign keys.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    response::{self, Envelope},
};
use axum::{extract::State, http::StatusCode};
use cpms_shared::models::member::{CreateMember, Member, UpdateMember};
use uuid::Uuid;
use validator::Validate;

/// Create a new member
pub async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<CreateMember>,
) -> ApiResult<(StatusCode, Json<Envelope<Member>>)> {
    req.validate()?;

    let member = Member::create(&state.db, req).await?;

    Ok(response::created(member, "Member created"))
}

/// List all members, newest first
pub async fn list_members(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Member>>>> {
    let members = Member::list(&state.db).await?;

    Ok(response::success(members, "Members fetched"))
}

/// Partially update a member
///
/// # Errors
///
/// - `400 Bad Request`: no updatable fields in the body
/// - `404 Not Found`: no member with the given id
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMember>,
) -> ApiResult<Json<Envelope<Member>>> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("No valid fields provided".to_string()));
    }
    req.validate()?;

    let member = Member::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(response::success(member, "Member updated"))
}

/// Delete a member, returning the deleted row
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Member>>> {
    let member = Member::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(response::success(member, "Member deleted"))
}
