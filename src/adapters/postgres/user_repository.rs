//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AppError, UserId};
use crate::domain::organization::User;
use crate::ports::UserRepository;

/// PostgreSQL-backed user store.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, AppError> {
    Ok(User {
        id: UserId::from_uuid(row.try_get("id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        row_to_user(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }
}
