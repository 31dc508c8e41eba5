//! Org-scoped authorization guard shared by the handler groups.

use crate::adapters::http::AppState;
use crate::domain::foundation::{AppError, OrgId};
use crate::domain::organization::User;

/// Fails with 403 unless the user belongs to the organization.
pub async fn ensure_owner(state: &AppState, org_id: &OrgId, user: &User) -> Result<(), AppError> {
    if state.identity.is_owner(org_id, &user.id).await? {
        Ok(())
    } else {
        Err(AppError::unauthorized(
            "you do not belong to this organization",
        ))
    }
}
