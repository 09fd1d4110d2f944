//! Enterprise and membership entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::enterprise::{Enterprise, EnterpriseMember, EnterpriseRole, MembershipStatus};
use domain::DomainError;

/// Database row mapping for the enterprises table.
#[derive(Debug, Clone, FromRow)]
pub struct EnterpriseEntity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<EnterpriseEntity> for Enterprise {
    fn from(entity: EnterpriseEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        }
    }
}

/// Database row mapping for the enterprise_members table.
#[derive(Debug, Clone, FromRow)]
pub struct EnterpriseMemberEntity {
    pub id: i64,
    pub enterprise_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EnterpriseMemberEntity> for EnterpriseMember {
    type Error = DomainError;

    fn try_from(entity: EnterpriseMemberEntity) -> Result<Self, Self::Error> {
        Ok(EnterpriseMember {
            id: entity.id,
            enterprise_id: entity.enterprise_id,
            user_id: entity.user_id,
            role: entity
                .role
                .parse::<EnterpriseRole>()
                .map_err(|e| DomainError::Internal(format!("Corrupt membership row: {}", e)))?,
            status: entity
                .status
                .parse::<MembershipStatus>()
                .map_err(|e| DomainError::Internal(format!("Corrupt membership row: {}", e)))?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_entity_to_domain() {
        let entity = EnterpriseMemberEntity {
            id: 1,
            enterprise_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: "ADMIN".to_string(),
            status: "DISABLED".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let member: EnterpriseMember = entity.try_into().unwrap();
        assert_eq!(member.role, EnterpriseRole::Admin);
        assert_eq!(member.status, MembershipStatus::Disabled);
    }
}
