//! Confirmation side-effect dispatch.
//!
//! Confirming a CONFIRMATION notification can trigger a domain side effect
//! (e.g. an enterprise invitation enables the target membership). Effects are
//! resolved through a dispatch table keyed by [`ActionTag`] rather than a
//! growing conditional; handlers are registered at application wiring time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DomainError;
use crate::models::notification::{ActionTag, Notification, NotificationType};

/// A side effect executed when a tagged notification is decided.
#[async_trait::async_trait]
pub trait ConfirmationEffect: Send + Sync {
    async fn apply(&self, notification: &Notification, accepted: bool) -> Result<(), DomainError>;
}

/// Dispatch table from action tag to effect handler.
#[derive(Default)]
pub struct ConfirmationDispatcher {
    handlers: HashMap<ActionTag, Arc<dyn ConfirmationEffect>>,
}

impl ConfirmationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for a tag, replacing any previous one.
    pub fn register(mut self, tag: ActionTag, handler: Arc<dyn ConfirmationEffect>) -> Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// Applies the effect for a decided notification.
    ///
    /// Untagged notifications and tags without a registered handler are a
    /// no-op; only CONFIRMATION notifications may be dispatched.
    pub async fn dispatch(
        &self,
        notification: &Notification,
        accepted: bool,
    ) -> Result<(), DomainError> {
        if notification.notification_type != NotificationType::Confirmation {
            return Err(DomainError::Unprocessable(
                "Only confirmation notifications can be confirmed".into(),
            ));
        }

        let Some(tag) = notification.action_tag else {
            return Ok(());
        };

        match self.handlers.get(&tag) {
            Some(handler) => handler.apply(notification, accepted).await,
            None => {
                tracing::warn!(action_tag = %tag, "No confirmation handler registered");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for ConfirmationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationDispatcher")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use uuid::Uuid;

    struct RecordingEffect {
        calls: AtomicUsize,
        last_accepted: AtomicBool,
    }

    impl RecordingEffect {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_accepted: AtomicBool::new(false),
            })
        }
    }

    #[async_trait::async_trait]
    impl ConfirmationEffect for RecordingEffect {
        async fn apply(
            &self,
            _notification: &Notification,
            accepted: bool,
        ) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_accepted.store(accepted, Ordering::SeqCst);
            Ok(())
        }
    }

    fn confirmation(tag: Option<ActionTag>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title: "Invitation".to_string(),
            message: "Join Acme".to_string(),
            notification_type: NotificationType::Confirmation,
            action_tag: tag,
            read: false,
            confirmed: None,
            user_id: Uuid::new_v4(),
            enterprise_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_invokes_registered_handler() {
        let effect = RecordingEffect::new();
        let dispatcher = ConfirmationDispatcher::new()
            .register(ActionTag::EnterpriseInvitation, effect.clone());

        let n = confirmation(Some(ActionTag::EnterpriseInvitation));
        dispatcher.dispatch(&n, true).await.unwrap();

        assert_eq!(effect.calls.load(Ordering::SeqCst), 1);
        assert!(effect.last_accepted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dispatch_passes_rejection() {
        let effect = RecordingEffect::new();
        let dispatcher = ConfirmationDispatcher::new()
            .register(ActionTag::EnterpriseInvitation, effect.clone());

        let n = confirmation(Some(ActionTag::EnterpriseInvitation));
        dispatcher.dispatch(&n, false).await.unwrap();

        assert_eq!(effect.calls.load(Ordering::SeqCst), 1);
        assert!(!effect.last_accepted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dispatch_untagged_is_noop() {
        let dispatcher = ConfirmationDispatcher::new();
        let n = confirmation(None);
        assert!(dispatcher.dispatch(&n, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_rejects_non_confirmation() {
        let dispatcher = ConfirmationDispatcher::new();
        let mut n = confirmation(None);
        n.notification_type = NotificationType::Info;

        let result = dispatcher.dispatch(&n, true).await;
        assert!(matches!(result, Err(DomainError::Unprocessable(_))));
    }

    #[tokio::test]
    async fn test_dispatch_unregistered_tag_is_noop() {
        let dispatcher = ConfirmationDispatcher::new();
        let n = confirmation(Some(ActionTag::EnterpriseInvitation));
        assert!(dispatcher.dispatch(&n, true).await.is_ok());
    }
}
