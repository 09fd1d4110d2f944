//! Notification endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use domain::models::notification::{ConfirmRequest, Notification};

/// Response for the bulk mark-read endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// GET /api/notifications - the caller's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state.notifications.list(auth.user_id).await?;
    Ok(Json(notifications))
}

/// POST /api/notifications/:id/read - mark one notification as read.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.notifications.mark_read(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/notifications/read-all - mark every unread notification as read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = state.notifications.mark_all_read(auth.user_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// POST /api/notifications/:id/confirm - decide a CONFIRMATION notification.
pub async fn confirm_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<Notification>, ApiError> {
    let notification = state
        .notifications
        .confirm(auth.user_id, id, request.accepted)
        .await?;
    Ok(Json(notification))
}

/// DELETE /api/notifications/:id - soft delete.
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.notifications.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_all_read_response_serialization() {
        let response = MarkAllReadResponse { updated: 3 };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"updated":3}"#);
    }
}
