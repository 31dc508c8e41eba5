//! PostgreSQL implementation of SourceRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AppError, OrgId, SourceId};
use crate::domain::source::{Source, SourceConfig};
use crate::ports::SourceRepository;

/// PostgreSQL-backed source store.
#[derive(Clone)]
pub struct PostgresSourceRepository {
    pool: PgPool,
}

impl PostgresSourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_source(row: &sqlx::postgres::PgRow) -> Result<Source, AppError> {
    let config: SourceConfig = serde_json::from_value(row.try_get("config")?)
        .map_err(|e| AppError::database(format!("corrupt source config: {}", e)))?;
    Ok(Source {
        id: SourceId::from_uuid(row.try_get("id")?),
        org_id: OrgId::from_uuid(row.try_get("org_id")?),
        name: row.try_get("name")?,
        config,
        last_sync_at: row.try_get::<Option<DateTime<Utc>>, _>("last_sync_at")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl SourceRepository for PostgresSourceRepository {
    async fn create(&self, source: &Source) -> Result<(), AppError> {
        let config = serde_json::to_value(&source.config)
            .map_err(|e| AppError::database(format!("unserializable source config: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO sources (id, org_id, name, kind, config, location, last_sync_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (org_id, location) DO NOTHING
            "#,
        )
        .bind(source.id.as_uuid())
        .bind(source.org_id.as_uuid())
        .bind(&source.name)
        .bind(source.config.kind().as_str())
        .bind(config)
        .bind(source.config.location())
        .bind(source.last_sync_at)
        .bind(source.created_at)
        .execute(&self.pool)
        .await?;

        // A lost insert here means another writer registered the same
        // location between the dedupe check and this statement.
        if result.rows_affected() == 0 {
            return Err(AppError::duplicate_source(source.config.location()));
        }
        Ok(())
    }

    async fn location_exists(&self, org_id: &OrgId, location: &str) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM sources WHERE org_id = $1 AND location = $2",
        )
        .bind(org_id.as_uuid())
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get::<i64, _>("count")? > 0)
    }

    async fn list_by_org(&self, org_id: &OrgId) -> Result<Vec<Source>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, org_id, name, kind, config, location, last_sync_at, created_at
            FROM sources WHERE org_id = $1 ORDER BY created_at
            "#,
        )
        .bind(org_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_source).collect()
    }
}
