//! Authentication endpoint handlers.

use axum::{extract::State, Json};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::user::{LoginRequest, LoginResponse, User, UserStatus};
use shared::password::verify_password;

/// Login with email and password, returning a bearer token.
///
/// Credential failures are indistinguishable on purpose: unknown email and
/// wrong password both return 401.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let entity = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;
    let user: User = entity.try_into().map_err(ApiError::from)?;

    let password_ok = verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;
    if !password_ok {
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    if user.status != UserStatus::Enabled {
        return Err(ApiError::Forbidden("Account is disabled".into()));
    }

    let access_token = state
        .jwt
        .issue_access_token(user.id, user.role.as_str())
        .map_err(|e| ApiError::Internal(format!("Token issuance failed: {}", e)))?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in_secs: state.config.jwt.access_token_expiry_secs,
        user: user.into(),
    }))
}
