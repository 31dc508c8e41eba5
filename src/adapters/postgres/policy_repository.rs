//! PostgreSQL implementation of PolicyRepository.
//!
//! Guardrail merging happens in SQL so concurrent writers union into
//! the stored set instead of clobbering each other.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AppError, OrgId};
use crate::ports::PolicyRepository;

/// PostgreSQL-backed policy preference store.
#[derive(Clone)]
pub struct PostgresPolicyRepository {
    pool: PgPool,
}

impl PostgresPolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyRepository for PostgresPolicyRepository {
    async fn merge_guardrails(&self, org_id: &OrgId, words: &[String]) -> Result<(), AppError> {
        if words.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO org_preferences (org_id, guardrails)
            VALUES ($1, $2)
            ON CONFLICT (org_id)
            DO UPDATE SET guardrails = ARRAY(
                SELECT DISTINCT unnest(org_preferences.guardrails || EXCLUDED.guardrails)
            )
            "#,
        )
        .bind(org_id.as_uuid())
        .bind(words)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn guardrails(&self, org_id: &OrgId) -> Result<Vec<String>, AppError> {
        let row = sqlx::query("SELECT guardrails FROM org_preferences WHERE org_id = $1")
            .bind(org_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => row.try_get::<Vec<String>, _>("guardrails")?,
            None => Vec::new(),
        })
    }

    async fn set_persona_prompt(&self, org_id: &OrgId, prompt: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO org_preferences (org_id, persona_prompt)
            VALUES ($1, $2)
            ON CONFLICT (org_id)
            DO UPDATE SET persona_prompt = EXCLUDED.persona_prompt
            "#,
        )
        .bind(org_id.as_uuid())
        .bind(prompt)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn persona_prompt(&self, org_id: &OrgId) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT persona_prompt FROM org_preferences WHERE org_id = $1")
            .bind(org_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => row.try_get::<Option<String>, _>("persona_prompt")?,
            None => None,
        })
    }
}
