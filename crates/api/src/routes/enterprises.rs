//! Enterprise endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use domain::models::enterprise::{
    CreateEnterpriseRequest, Enterprise, EnterpriseMember, InviteMemberRequest,
};

/// POST /api/enterprises - create an enterprise.
pub async fn create_enterprise(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateEnterpriseRequest>,
) -> Result<(StatusCode, Json<Enterprise>), ApiError> {
    request.validate()?;

    let enterprise = state
        .enterprises
        .create(auth.user_id, auth.role, request)
        .await?;
    Ok((StatusCode::CREATED, Json(enterprise)))
}

/// GET /api/enterprises/:id - one enterprise.
pub async fn get_enterprise(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Enterprise>, ApiError> {
    let enterprise = state.enterprises.get(auth.user_id, auth.role, id).await?;
    Ok(Json(enterprise))
}

/// POST /api/enterprises/:id/members - invite a user.
///
/// The invitation is pending until the target user confirms the notification
/// it produces.
pub async fn invite_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<InviteMemberRequest>,
) -> Result<(StatusCode, Json<EnterpriseMember>), ApiError> {
    let member = state
        .enterprises
        .invite(auth.user_id, auth.role, id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/enterprises/:id/members - list memberships.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EnterpriseMember>>, ApiError> {
    let members = state
        .enterprises
        .members(auth.user_id, auth.role, id)
        .await?;
    Ok(Json(members))
}
