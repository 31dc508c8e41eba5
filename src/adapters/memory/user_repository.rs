//! In-memory UserRepository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{AppError, UserId};
use crate::domain::organization::User;
use crate::ports::UserRepository;

/// HashMap-backed user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == email) {
            return Err(AppError::database("email already registered"));
        }
        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }
}
