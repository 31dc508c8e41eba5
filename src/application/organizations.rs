//! Organization lifecycle service.
//!
//! Creation is a best-effort saga: the engine is provisioned first, so
//! a failed `init` leaves nothing persisted locally. If the local
//! insert fails after a successful `init`, the engine side is left
//! orphaned; there is no compensating call.

use std::sync::Arc;

use crate::domain::foundation::{AppError, OrgId, UserId};
use crate::domain::organization::Organization;
use crate::ports::{OrganizationRepository, ReasoningEngine};

/// Create/list operations for organizations.
pub struct OrganizationService {
    organizations: Arc<dyn OrganizationRepository>,
    engine: Arc<dyn ReasoningEngine>,
}

impl OrganizationService {
    pub fn new(
        organizations: Arc<dyn OrganizationRepository>,
        engine: Arc<dyn ReasoningEngine>,
    ) -> Self {
        Self {
            organizations,
            engine,
        }
    }

    /// Creates an organization owned by `creator`.
    pub async fn create(
        &self,
        creator: &UserId,
        name: &str,
        description: &str,
    ) -> Result<Organization, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Organization name is required"));
        }

        let organization = Organization::new(name, description);

        // Provision engine-side state before anything becomes visible
        // locally; a failure here aborts the creation outright.
        self.engine.init(&organization.id).await?;

        self.organizations
            .create_with_owner(&organization, creator)
            .await?;

        tracing::info!(org_id = %organization.id, name, "organization created");
        Ok(organization)
    }

    /// Organizations the user belongs to.
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Organization>, AppError> {
        self.organizations.list_for_user(user_id).await
    }

    /// Fetches an organization or fails with NotFound.
    pub async fn get(&self, org_id: &OrgId) -> Result<Organization, AppError> {
        self.organizations
            .find_by_id(org_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization", org_id))
    }
}
