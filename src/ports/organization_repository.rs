//! Organization repository port.

use async_trait::async_trait;

use crate::domain::foundation::{AppError, OrgId, UserId};
use crate::domain::organization::{MemberRole, Organization};

/// Persistence contract for organizations and memberships.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Inserts the organization and its owner membership in one
    /// transaction so a half-created tenant is never visible.
    async fn create_with_owner(
        &self,
        organization: &Organization,
        owner: &UserId,
    ) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &OrgId) -> Result<Option<Organization>, AppError>;

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Organization>, AppError>;

    /// True iff a membership row exists. The current authorization
    /// model treats any membership as ownership.
    async fn is_member(&self, org_id: &OrgId, user_id: &UserId) -> Result<bool, AppError>;

    /// Adds a membership; idempotent for an existing (user, org) pair.
    async fn add_member(
        &self,
        org_id: &OrgId,
        user_id: &UserId,
        role: MemberRole,
    ) -> Result<(), AppError>;
}
