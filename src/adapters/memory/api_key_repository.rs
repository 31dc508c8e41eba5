//! In-memory ApiKeyRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{AppError, OrgId};
use crate::ports::ApiKeyRepository;

/// HashMap-backed API key hash store, one entry per organization.
#[derive(Default)]
pub struct InMemoryApiKeyRepository {
    hashes: Mutex<HashMap<OrgId, String>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn upsert(&self, org_id: &OrgId, key_hash: &str) -> Result<(), AppError> {
        self.hashes
            .lock()
            .unwrap()
            .insert(*org_id, key_hash.to_string());
        Ok(())
    }

    async fn hash_for_org(&self, org_id: &OrgId) -> Result<Option<String>, AppError> {
        Ok(self.hashes.lock().unwrap().get(org_id).cloned())
    }

    async fn delete_by_hash(&self, key_hash: &str) -> Result<(), AppError> {
        self.hashes.lock().unwrap().retain(|_, v| v != key_hash);
        Ok(())
    }
}
