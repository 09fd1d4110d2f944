//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of notification shown to the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Info,
    Warning,
    Error,
    Success,
    Confirmation,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "INFO",
            NotificationType::Warning => "WARNING",
            NotificationType::Error => "ERROR",
            NotificationType::Success => "SUCCESS",
            NotificationType::Confirmation => "CONFIRMATION",
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(NotificationType::Info),
            "WARNING" => Ok(NotificationType::Warning),
            "ERROR" => Ok(NotificationType::Error),
            "SUCCESS" => Ok(NotificationType::Success),
            "CONFIRMATION" => Ok(NotificationType::Confirmation),
            _ => Err(format!("Invalid notification type: {}", s)),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag identifying the domain action that produced a CONFIRMATION notification.
///
/// Confirmation side effects are dispatched through a table keyed by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionTag {
    EnterpriseInvitation,
}

impl ActionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTag::EnterpriseInvitation => "ENTERPRISE_INVITATION",
        }
    }
}

impl FromStr for ActionTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTERPRISE_INVITATION" => Ok(ActionTag::EnterpriseInvitation),
            _ => Err(format!("Invalid action tag: {}", s)),
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-visible event correlated to a domain action.
///
/// `confirmed` is only meaningful for CONFIRMATION notifications: `None` means
/// pending, `Some(true)` accepted, `Some(false)` rejected. Notifications are
/// soft-deleted, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_tag: Option<ActionTag>,
    pub read: bool,
    pub confirmed: Option<bool>,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// True for a CONFIRMATION notification that has not been decided yet.
    pub fn is_pending_confirmation(&self) -> bool {
        self.notification_type == NotificationType::Confirmation && self.confirmed.is_none()
    }
}

/// Input for creating a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub action_tag: Option<ActionTag>,
    pub user_id: Uuid,
    pub enterprise_id: Option<Uuid>,
}

/// Request payload for deciding a CONFIRMATION notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub accepted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(notification_type: NotificationType, confirmed: Option<bool>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title: "Enterprise invitation".to_string(),
            message: "You were invited to Acme Logistics".to_string(),
            notification_type,
            action_tag: Some(ActionTag::EnterpriseInvitation),
            read: false,
            confirmed,
            user_id: Uuid::new_v4(),
            enterprise_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_pending_confirmation() {
        assert!(sample(NotificationType::Confirmation, None).is_pending_confirmation());
        assert!(!sample(NotificationType::Confirmation, Some(true)).is_pending_confirmation());
        assert!(!sample(NotificationType::Info, None).is_pending_confirmation());
    }

    #[test]
    fn test_type_parse_roundtrip() {
        for t in [
            NotificationType::Info,
            NotificationType::Warning,
            NotificationType::Error,
            NotificationType::Success,
            NotificationType::Confirmation,
        ] {
            assert_eq!(t.as_str().parse::<NotificationType>().unwrap(), t);
        }
    }

    #[test]
    fn test_serialization_shape() {
        let n = sample(NotificationType::Confirmation, None);
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"notificationType\":\"CONFIRMATION\""));
        assert!(json.contains("\"actionTag\":\"ENTERPRISE_INVITATION\""));
        assert!(json.contains("\"confirmed\":null"));
        assert!(!json.contains("deletedAt"));
    }
}
