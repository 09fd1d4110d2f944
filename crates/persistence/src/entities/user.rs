//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::user::{Role, User, UserStatus};
use domain::DomainError;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserEntity> for User {
    type Error = DomainError;

    fn try_from(entity: UserEntity) -> Result<Self, Self::Error> {
        Ok(User {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            password_hash: entity.password_hash,
            role: entity
                .role
                .parse::<Role>()
                .map_err(|e| DomainError::Internal(format!("Corrupt user row: {}", e)))?,
            status: entity
                .status
                .parse::<UserStatus>()
                .map_err(|e| DomainError::Internal(format!("Corrupt user row: {}", e)))?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_domain() {
        let entity = UserEntity {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$x".to_string(),
            role: "ADMIN".to_string(),
            status: "ENABLED".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let user: User = entity.try_into().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.status, UserStatus::Enabled);
    }

    #[test]
    fn test_corrupt_role_fails() {
        let entity = UserEntity {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$x".to_string(),
            role: "ROOT".to_string(),
            status: "ENABLED".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let result: Result<User, _> = entity.try_into();
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
