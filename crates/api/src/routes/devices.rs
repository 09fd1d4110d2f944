//! Device endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use domain::models::device::{
    CreateDeviceRequest, Device, DeviceWithCoordinates, UpdateDeviceRequest,
};

/// Request payload for toggling the active flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub active: bool,
}

/// POST /api/devices - register a device owned by the caller.
pub async fn create_device(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateDeviceRequest>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    request.validate()?;

    let device = state.registry.create(auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// GET /api/devices - list visible devices with their latest coordinate.
pub async fn list_devices(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<DeviceWithCoordinates>>, ApiError> {
    let devices = state
        .registry
        .list_with_latest(auth.user_id, auth.role)
        .await?;
    Ok(Json(devices))
}

/// GET /api/devices/:id - one device with its recent coordinates.
pub async fn get_device(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeviceWithCoordinates>, ApiError> {
    let device = state
        .registry
        .get_with_coordinates(auth.user_id, auth.role, id)
        .await?;
    Ok(Json(device))
}

/// PATCH /api/devices/:id - partial update.
pub async fn update_device(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDeviceRequest>,
) -> Result<Json<Device>, ApiError> {
    request.validate()?;

    let device = state
        .registry
        .update(auth.user_id, auth.role, id, request)
        .await?;
    Ok(Json(device))
}

/// PATCH /api/devices/:id/active - enable or disable reporting.
pub async fn set_device_active(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<Device>, ApiError> {
    let device = state
        .registry
        .set_active(auth.user_id, auth.role, id, request.active)
        .await?;
    Ok(Json(device))
}

/// DELETE /api/devices/:id - soft delete.
pub async fn delete_device(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete(auth.user_id, auth.role, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
