//! PostgreSQL implementation of OrganizationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AppError, OrgId, UserId};
use crate::domain::organization::{MemberRole, Organization};
use crate::ports::OrganizationRepository;

/// PostgreSQL-backed organization and membership store.
#[derive(Clone)]
pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_org(row: &sqlx::postgres::PgRow) -> Result<Organization, AppError> {
    Ok(Organization {
        id: OrgId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn create_with_owner(
        &self,
        organization: &Organization,
        owner: &UserId,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO organizations (id, name, description, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(organization.id.as_uuid())
        .bind(&organization.name)
        .bind(&organization.description)
        .bind(organization.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO memberships (user_id, org_id, role) VALUES ($1, $2, $3)")
            .bind(owner.as_uuid())
            .bind(organization.id.as_uuid())
            .bind(MemberRole::Owner.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &OrgId) -> Result<Option<Organization>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at FROM organizations WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_org).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Organization>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.name, o.description, o.created_at
            FROM organizations o
            JOIN memberships m ON o.id = m.org_id
            WHERE m.user_id = $1
            ORDER BY o.created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_org).collect()
    }

    async fn is_member(&self, org_id: &OrgId, user_id: &UserId) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM memberships WHERE org_id = $1 AND user_id = $2",
        )
        .bind(org_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get::<i64, _>("count")? == 1)
    }

    async fn add_member(
        &self,
        org_id: &OrgId,
        user_id: &UserId,
        role: MemberRole,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, org_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, org_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(org_id.as_uuid())
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
