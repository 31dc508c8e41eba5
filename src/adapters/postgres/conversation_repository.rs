//! PostgreSQL implementation of ConversationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::conversation::{CallerIdentity, Conversation, Message, Role};
use crate::domain::foundation::{AppError, ConversationId, MessageId, OrgId, UserId};
use crate::ports::{ConversationRepository, ConversationWithHistory, OrgUsage};

/// Bound used when embedding histories in org-wide listings.
const EMBEDDED_HISTORY_LIMIT: u32 = 10;

/// PostgreSQL-backed conversation and message store.
#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_conversation(row: &sqlx::postgres::PgRow) -> Result<Conversation, AppError> {
    let user_id = row
        .try_get::<Option<Uuid>, _>("user_id")?
        .map(UserId::from_uuid);
    let anonymous_id = row.try_get::<Option<String>, _>("anonymous_id")?;
    Ok(Conversation {
        id: ConversationId::from_uuid(row.try_get("id")?),
        org_id: OrgId::from_uuid(row.try_get("org_id")?),
        caller: CallerIdentity::from_columns(user_id, anonymous_id)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn row_to_message(row: &sqlx::postgres::PgRow) -> Result<Message, AppError> {
    let role: String = row.try_get("role")?;
    Ok(Message {
        id: MessageId::from_uuid(row.try_get("id")?),
        conversation_id: ConversationId::from_uuid(row.try_get("conversation_id")?),
        role: role
            .parse::<Role>()
            .map_err(|e| AppError::database(format!("corrupt message row: {}", e)))?,
        content: row.try_get("content")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, org_id, user_id, anonymous_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(conversation.id.as_uuid())
        .bind(conversation.org_id.as_uuid())
        .bind(conversation.caller.user_id().map(|u| *u.as_uuid()))
        .bind(conversation.caller.anonymous_id())
        .bind(conversation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, AppError> {
        let row = sqlx::query(
            "SELECT id, org_id, user_id, anonymous_id, created_at FROM conversations WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn append_message(&self, message: &Message) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.conversation_id.as_uuid())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn history(
        &self,
        id: &ConversationId,
        limit: u32,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, role, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, seq DESC
            LIMIT $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_message).collect()
    }

    async fn list_by_org(
        &self,
        org_id: &OrgId,
    ) -> Result<Vec<ConversationWithHistory>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, org_id, user_id, anonymous_id, created_at
            FROM conversations WHERE org_id = $1 ORDER BY created_at
            "#,
        )
        .bind(org_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        // Histories are fetched per conversation; a message landing
        // between two fetches is acceptable for this analytics view.
        let mut result = Vec::with_capacity(rows.len());
        for row in &rows {
            let conversation = row_to_conversation(row)?;
            let messages = self
                .history(&conversation.id, EMBEDDED_HISTORY_LIMIT)
                .await?;
            result.push(ConversationWithHistory {
                conversation,
                messages,
            });
        }
        Ok(result)
    }

    async fn usage(&self, org_id: &OrgId) -> Result<OrgUsage, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM messages m
                   JOIN conversations c ON m.conversation_id = c.id
                   WHERE c.org_id = $1 AND m.role = 'user') AS total_queries,
                (SELECT COUNT(DISTINCT COALESCE(user_id::TEXT, anonymous_id))
                   FROM conversations WHERE org_id = $1) AS total_users,
                (SELECT COALESCE(AVG(n), 0)::FLOAT8 FROM (
                    SELECT COUNT(m.id) AS n
                    FROM conversations c
                    LEFT JOIN messages m ON m.conversation_id = c.id
                    WHERE c.org_id = $1
                    GROUP BY c.id
                ) lengths) AS average_length
            "#,
        )
        .bind(org_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(OrgUsage {
            total_queries: row.try_get::<i64, _>("total_queries")? as u64,
            total_users: row.try_get::<i64, _>("total_users")? as u64,
            average_conversation_length: row.try_get::<f64, _>("average_length")?,
        })
    }
}
