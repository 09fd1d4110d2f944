//! Notification center service.
//!
//! Recipients only ever see their own notifications. Confirming a
//! CONFIRMATION notification records the decision exactly once and then runs
//! the registered side effect for its action tag.

use std::sync::Arc;

use uuid::Uuid;

use domain::models::notification::Notification;
use domain::services::confirmation::ConfirmationDispatcher;
use domain::DomainError;
use persistence::repositories::NotificationRepository;

#[derive(Clone)]
pub struct NotificationCenter {
    notifications: NotificationRepository,
    dispatcher: Arc<ConfirmationDispatcher>,
}

impl NotificationCenter {
    pub fn new(
        notifications: NotificationRepository,
        dispatcher: Arc<ConfirmationDispatcher>,
    ) -> Self {
        Self {
            notifications,
            dispatcher,
        }
    }

    /// Lists the actor's live notifications, newest first.
    pub async fn list(&self, actor_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        self.notifications
            .list_for_user(actor_id)
            .await
            .map_err(DomainError::from)?
            .into_iter()
            .map(Notification::try_from)
            .collect()
    }

    /// Marks one of the actor's notifications as read.
    pub async fn mark_read(&self, actor_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.find_owned(actor_id, id).await?;
        self.notifications
            .mark_read(id)
            .await
            .map_err(DomainError::from)?;
        Ok(())
    }

    /// Marks every unread notification of the actor as read.
    /// Returns the number of notifications affected.
    pub async fn mark_all_read(&self, actor_id: Uuid) -> Result<u64, DomainError> {
        self.notifications
            .mark_all_read(actor_id)
            .await
            .map_err(DomainError::from)
    }

    /// Records the decision on a pending CONFIRMATION notification and runs
    /// the side effect registered for its action tag.
    pub async fn confirm(
        &self,
        actor_id: Uuid,
        id: Uuid,
        accepted: bool,
    ) -> Result<Notification, DomainError> {
        let notification = self.find_owned(actor_id, id).await?;

        if !notification.is_pending_confirmation() {
            return if notification.confirmed.is_some() {
                Err(DomainError::Conflict(
                    "Notification was already decided".into(),
                ))
            } else {
                Err(DomainError::Unprocessable(
                    "Only confirmation notifications can be confirmed".into(),
                ))
            };
        }

        // The repository guards on `confirmed IS NULL`, so a concurrent
        // decision loses here instead of running the effect twice.
        let affected = self
            .notifications
            .set_confirmed(id, accepted)
            .await
            .map_err(DomainError::from)?;
        if affected == 0 {
            return Err(DomainError::Conflict(
                "Notification was already decided".into(),
            ));
        }

        let mut decided = notification;
        decided.confirmed = Some(accepted);
        decided.read = true;

        self.dispatcher.dispatch(&decided, accepted).await?;
        Ok(decided)
    }

    /// Soft-deletes one of the actor's notifications.
    pub async fn delete(&self, actor_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.find_owned(actor_id, id).await?;
        let affected = self
            .notifications
            .soft_delete(id)
            .await
            .map_err(DomainError::from)?;
        if affected == 0 {
            return Err(DomainError::NotFound("Notification not found".into()));
        }
        Ok(())
    }

    async fn find_owned(&self, actor_id: Uuid, id: Uuid) -> Result<Notification, DomainError> {
        let notification: Notification = self
            .notifications
            .find_by_id(id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::NotFound("Notification not found".into()))?
            .try_into()?;

        if notification.user_id != actor_id {
            return Err(DomainError::Forbidden(
                "This notification belongs to another user".into(),
            ));
        }
        Ok(notification)
    }
}
