//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::notification::{ActionTag, Notification, NotificationType};
use domain::DomainError;

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub action_tag: Option<String>,
    pub read: bool,
    pub confirmed: Option<bool>,
    pub user_id: Uuid,
    pub enterprise_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<NotificationEntity> for Notification {
    type Error = DomainError;

    fn try_from(entity: NotificationEntity) -> Result<Self, Self::Error> {
        let action_tag = entity
            .action_tag
            .as_deref()
            .map(|s| s.parse::<ActionTag>())
            .transpose()
            .map_err(|e| DomainError::Internal(format!("Corrupt notification row: {}", e)))?;

        Ok(Notification {
            id: entity.id,
            title: entity.title,
            message: entity.message,
            notification_type: entity
                .notification_type
                .parse::<NotificationType>()
                .map_err(|e| DomainError::Internal(format!("Corrupt notification row: {}", e)))?,
            action_tag,
            read: entity.read,
            confirmed: entity.confirmed,
            user_id: entity.user_id,
            enterprise_id: entity.enterprise_id,
            created_at: entity.created_at,
            deleted_at: entity.deleted_at,
        })
    }
}
