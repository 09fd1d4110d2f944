//! Enterprise and membership repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EnterpriseEntity, EnterpriseMemberEntity};

/// Repository for enterprise-related database operations.
#[derive(Clone)]
pub struct EnterpriseRepository {
    pool: PgPool,
}

impl EnterpriseRepository {
    /// Creates a new EnterpriseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an enterprise. Name uniqueness is enforced by a partial unique
    /// index; a violation surfaces as code 23505.
    pub async fn insert(&self, name: &str) -> Result<EnterpriseEntity, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, EnterpriseEntity>(
            r#"
            INSERT INTO enterprises (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a live enterprise by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EnterpriseEntity>, sqlx::Error> {
        sqlx::query_as::<_, EnterpriseEntity>(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM enterprises
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a membership edge. Duplicate (enterprise, user) pairs hit the
    /// unique constraint and surface as code 23505.
    pub async fn add_member(
        &self,
        enterprise_id: Uuid,
        user_id: Uuid,
        role: &str,
        status: &str,
    ) -> Result<EnterpriseMemberEntity, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, EnterpriseMemberEntity>(
            r#"
            INSERT INTO enterprise_members (enterprise_id, user_id, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, enterprise_id, user_id, role, status, created_at, updated_at
            "#,
        )
        .bind(enterprise_id)
        .bind(user_id)
        .bind(role)
        .bind(status)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// List memberships of an enterprise.
    pub async fn list_members(
        &self,
        enterprise_id: Uuid,
    ) -> Result<Vec<EnterpriseMemberEntity>, sqlx::Error> {
        sqlx::query_as::<_, EnterpriseMemberEntity>(
            r#"
            SELECT id, enterprise_id, user_id, role, status, created_at, updated_at
            FROM enterprise_members
            WHERE enterprise_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(enterprise_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Find one membership edge.
    pub async fn find_membership(
        &self,
        enterprise_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EnterpriseMemberEntity>, sqlx::Error> {
        sqlx::query_as::<_, EnterpriseMemberEntity>(
            r#"
            SELECT id, enterprise_id, user_id, role, status, created_at, updated_at
            FROM enterprise_members
            WHERE enterprise_id = $1 AND user_id = $2
            "#,
        )
        .bind(enterprise_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Update one membership edge's status.
    /// Returns the number of rows affected (0 if no such membership).
    pub async fn set_membership_status(
        &self,
        enterprise_id: Uuid,
        user_id: Uuid,
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE enterprise_members
            SET status = $3, updated_at = $4
            WHERE enterprise_id = $1 AND user_id = $2
            "#,
        )
        .bind(enterprise_id)
        .bind(user_id)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Enterprises where the user holds an enabled ADMIN membership.
    pub async fn admin_enterprise_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT enterprise_id
            FROM enterprise_members
            WHERE user_id = $1 AND role = 'ADMIN' AND status = 'ENABLED'
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Enterprises where the user holds any enabled membership.
    pub async fn enterprise_ids_of(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT enterprise_id
            FROM enterprise_members
            WHERE user_id = $1 AND status = 'ENABLED'
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
