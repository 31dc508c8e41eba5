//! In-memory OrganizationRepository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{AppError, OrgId, UserId};
use crate::domain::organization::{MemberRole, Membership, Organization};
use crate::ports::OrganizationRepository;

/// HashMap-backed organization and membership store.
#[derive(Default)]
pub struct InMemoryOrganizationRepository {
    orgs: Mutex<HashMap<OrgId, Organization>>,
    memberships: Mutex<Vec<Membership>>,
}

impl InMemoryOrganizationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn create_with_owner(
        &self,
        organization: &Organization,
        owner: &UserId,
    ) -> Result<(), AppError> {
        self.orgs
            .lock()
            .unwrap()
            .insert(organization.id, organization.clone());
        self.memberships.lock().unwrap().push(Membership {
            user_id: *owner,
            org_id: organization.id,
            role: MemberRole::Owner,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &OrgId) -> Result<Option<Organization>, AppError> {
        Ok(self.orgs.lock().unwrap().get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Organization>, AppError> {
        let memberships = self.memberships.lock().unwrap();
        let orgs = self.orgs.lock().unwrap();
        Ok(memberships
            .iter()
            .filter(|m| m.user_id == *user_id)
            .filter_map(|m| orgs.get(&m.org_id).cloned())
            .collect())
    }

    async fn is_member(&self, org_id: &OrgId, user_id: &UserId) -> Result<bool, AppError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.org_id == *org_id && m.user_id == *user_id))
    }

    async fn add_member(
        &self,
        org_id: &OrgId,
        user_id: &UserId,
        role: MemberRole,
    ) -> Result<(), AppError> {
        let mut memberships = self.memberships.lock().unwrap();
        if memberships
            .iter()
            .any(|m| m.org_id == *org_id && m.user_id == *user_id)
        {
            return Ok(());
        }
        memberships.push(Membership {
            user_id: *user_id,
            org_id: *org_id,
            role,
            created_at: Utc::now(),
        });
        Ok(())
    }
}
