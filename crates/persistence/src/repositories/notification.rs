//! Notification repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use domain::models::notification::NewNotification;

/// Repository for notification-related database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification.
    pub async fn insert(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationEntity, sqlx::Error> {
        sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (id, title, message, notification_type, action_tag,
                                       read, confirmed, user_id, enterprise_id, created_at)
            VALUES ($1, $2, $3, $4, $5, false, NULL, $6, $7, $8)
            RETURNING id, title, message, notification_type, action_tag,
                      read, confirmed, user_id, enterprise_id, created_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.notification_type.as_str())
        .bind(notification.action_tag.map(|t| t.as_str()))
        .bind(notification.user_id)
        .bind(notification.enterprise_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Find a live notification by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<NotificationEntity>, sqlx::Error> {
        sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, title, message, notification_type, action_tag,
                   read, confirmed, user_id, enterprise_id, created_at, deleted_at
            FROM notifications
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List live notifications for a user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, title, message, notification_type, action_tag,
                   read, confirmed, user_id, enterprise_id, created_at, deleted_at
            FROM notifications
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Mark one notification as read.
    /// Returns the number of rows affected (0 if notification not found).
    pub async fn mark_read(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = true
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark all of a user's live notifications as read.
    /// Returns the number of rows affected.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = true
            WHERE user_id = $1 AND read = false AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Record the decision on a pending CONFIRMATION notification.
    ///
    /// Only flips rows whose `confirmed` is still NULL, so a decision is
    /// recorded at most once. Returns the number of rows affected.
    pub async fn set_confirmed(&self, id: Uuid, accepted: bool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET confirmed = $2, read = true
            WHERE id = $1 AND confirmed IS NULL AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(accepted)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Soft-delete a notification.
    /// Returns the number of rows affected (0 if notification not found).
    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET deleted_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
