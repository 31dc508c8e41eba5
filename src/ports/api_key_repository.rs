//! API key repository port.
//!
//! Keys are stored as one-way hashes only; the plaintext exists for the
//! single moment it is returned to the caller at generation time.

use async_trait::async_trait;

use crate::domain::foundation::{AppError, OrgId};

/// Persistence contract for per-organization API key hashes.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Stores the hash for an organization, replacing any prior key
    /// material. The upsert guarantees at most one live key per org
    /// even under concurrent issuance.
    async fn upsert(&self, org_id: &OrgId, key_hash: &str) -> Result<(), AppError>;

    /// The stored hash for an organization, if a key was ever issued.
    async fn hash_for_org(&self, org_id: &OrgId) -> Result<Option<String>, AppError>;

    /// Deletes any row holding this hash; idempotent.
    async fn delete_by_hash(&self, key_hash: &str) -> Result<(), AppError>;
}
