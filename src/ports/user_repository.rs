//! User repository port.

use async_trait::async_trait;

use crate::domain::foundation::{AppError, UserId};
use crate::domain::organization::User;

/// Persistence contract for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user with an already-hashed password.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError>;
}
