//! PostgreSQL implementation of ApiKeyRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AppError, OrgId};
use crate::ports::ApiKeyRepository;

/// PostgreSQL-backed API key hash store. One row per organization.
#[derive(Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn upsert(&self, org_id: &OrgId, key_hash: &str) -> Result<(), AppError> {
        // The org_id primary key makes concurrent issuance converge on
        // a single stored hash: last writer wins, never two live keys.
        sqlx::query(
            r#"
            INSERT INTO org_api_keys (org_id, key_hash)
            VALUES ($1, $2)
            ON CONFLICT (org_id)
            DO UPDATE SET key_hash = EXCLUDED.key_hash, created_at = now()
            "#,
        )
        .bind(org_id.as_uuid())
        .bind(key_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn hash_for_org(&self, org_id: &OrgId) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT key_hash FROM org_api_keys WHERE org_id = $1")
            .bind(org_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            row.try_get::<String, _>("key_hash")
                .map(|h| h.trim().to_string())
                .map_err(AppError::from)
        })
        .transpose()
    }

    async fn delete_by_hash(&self, key_hash: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM org_api_keys WHERE key_hash = $1")
            .bind(key_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
