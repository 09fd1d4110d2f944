//! User account endpoint handlers.
//!
//! Edits are governed by the role hierarchy: an actor may only manage
//! accounts of strictly lower rank, and may never hand out a role at or
//! above their own.

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
use domain::models::user::{CreateUserRequest, Role, UpdateUserRequest, User, UserResponse};
use domain::services::access::{self, AccessScope, Permission};
use persistence::repositories::UserPatch;
use shared::password::hash_password;

/// POST /api/users - create an account with the USER role.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if !access::has_permission(auth.role, Permission::ManageUsers) {
        return Err(ApiError::Forbidden(
            "You are not allowed to manage users".into(),
        ));
    }
    request.validate()?;

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    // Email uniqueness is decided by the partial unique index.
    let entity = state
        .users
        .insert(
            &request.name,
            &request.email,
            &password_hash,
            Role::User.as_str(),
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict("Email already registered".into()),
            other => other,
        })?;

    let user: User = entity.try_into().map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users - list accounts.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    if !access::has_permission(auth.role, Permission::ManageUsers) {
        return Err(ApiError::Forbidden(
            "You are not allowed to manage users".into(),
        ));
    }

    let users = state
        .users
        .list()
        .await?
        .into_iter()
        .map(|entity| User::try_from(entity).map(UserResponse::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::from)?;
    Ok(Json(users))
}

/// GET /api/users/:id - own profile, a manager's view, or a member's
/// profile for an enterprise admin.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    if id != auth.user_id && !access::has_permission(auth.role, Permission::ManageUsers) {
        let scope = admin_scope(&state, &auth).await?;
        let target_enterprises = state.memberships.enterprise_ids_of(id).await?;
        if !access::can_view_user(&scope, id, &target_enterprises) {
            return Err(ApiError::Forbidden(
                "You are not allowed to view other users".into(),
            ));
        }
    }

    let user = find_user(&state, id).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/users/:id - update name, role or status.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;

    let target = find_user(&state, id).await?;
    authorize_edit(&state, &auth, &target).await?;

    // A granted role must stay strictly below the actor's own rank.
    if let Some(new_role) = request.role {
        if new_role.rank() >= auth.role.rank() {
            return Err(ApiError::Forbidden(
                "Cannot assign a role at or above your own".into(),
            ));
        }
    }

    let patch = UserPatch {
        name: request.name,
        role: request.role.map(|r| r.as_str().to_string()),
        status: request.status.map(|s| s.as_str().to_string()),
    };

    let entity = state
        .users
        .update(id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    let user: User = entity.try_into().map_err(ApiError::from)?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/:id - soft delete.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let target = find_user(&state, id).await?;
    authorize_edit(&state, &auth, &target).await?;

    let affected = state.users.soft_delete(id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_user(state: &AppState, id: Uuid) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?
        .try_into()
        .map_err(ApiError::from)
}

/// The actor plus the enterprises it administers, loaded once per request.
async fn admin_scope(state: &AppState, auth: &AuthUser) -> Result<AccessScope, ApiError> {
    let admin_enterprises = state.memberships.admin_enterprise_ids(auth.user_id).await?;
    Ok(AccessScope::new(auth.user_id, auth.role).with_admin_enterprises(admin_enterprises))
}

/// Edits go through the global hierarchy, or through an enterprise-admin
/// membership covering the target.
async fn authorize_edit(state: &AppState, auth: &AuthUser, target: &User) -> Result<(), ApiError> {
    let scope = admin_scope(state, auth).await?;
    let target_enterprises = state.memberships.enterprise_ids_of(target.id).await?;

    if access::can_manage_user(&scope, target.role, &target_enterprises) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You may not manage this account".into(),
        ))
    }
}
