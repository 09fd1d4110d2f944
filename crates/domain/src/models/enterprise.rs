//! Enterprise and membership domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role attached to an enterprise membership edge, distinct from the global role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnterpriseRole {
    Admin,
    Member,
}

impl EnterpriseRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnterpriseRole::Admin => "ADMIN",
            EnterpriseRole::Member => "MEMBER",
        }
    }

    /// Whether this membership role can manage other members' records.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, EnterpriseRole::Admin)
    }
}

impl FromStr for EnterpriseRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(EnterpriseRole::Admin),
            "MEMBER" => Ok(EnterpriseRole::Member),
            _ => Err(format!("Invalid enterprise role: {}", s)),
        }
    }
}

impl fmt::Display for EnterpriseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of one membership edge.
///
/// Invitations start `DISABLED`; confirming the invitation notification flips
/// the edge to `ENABLED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Enabled,
    Disabled,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Enabled => "ENABLED",
            MembershipStatus::Disabled => "DISABLED",
        }
    }
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENABLED" => Ok(MembershipStatus::Enabled),
            "DISABLED" => Ok(MembershipStatus::Disabled),
            _ => Err(format!("Invalid membership status: {}", s)),
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An organizational grouping of users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enterprise {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One membership edge: role metadata lives here, not on either node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseMember {
    pub id: i64,
    pub enterprise_id: Uuid,
    pub user_id: Uuid,
    pub role: EnterpriseRole,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for enterprise creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnterpriseRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
}

/// Request payload for inviting a user into an enterprise.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    pub user_id: Uuid,
    #[serde(default = "default_invite_role")]
    pub role: EnterpriseRole,
}

fn default_invite_role() -> EnterpriseRole {
    EnterpriseRole::Member
}
