//! Source repository port.

use async_trait::async_trait;

use crate::domain::foundation::{AppError, OrgId};
use crate::domain::source::Source;

/// Persistence contract for registered knowledge sources.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    async fn create(&self, source: &Source) -> Result<(), AppError>;

    /// Uniqueness probe for the per-organization location invariant.
    /// The same location in a different organization is allowed.
    async fn location_exists(&self, org_id: &OrgId, location: &str) -> Result<bool, AppError>;

    async fn list_by_org(&self, org_id: &OrgId) -> Result<Vec<Source>, AppError>;
}
