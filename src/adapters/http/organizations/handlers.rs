//! Organization handlers.
//!
//! Everything here is session-authenticated; org-scoped handlers also
//! check membership before touching tenant data.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapters::http::guard::ensure_owner;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::AppState;
use crate::application::DashboardReport;
use crate::domain::foundation::{AppError, OrgId};
use crate::domain::organization::Organization;
use crate::ports::ConversationWithHistory;

use super::dto::{AddMemberRequest, ApiKeyResponse, CreateOrganizationRequest, MessageResponse};

/// POST /api/organizations - create an organization owned by the caller.
pub async fn create_organization(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), AppError> {
    let organization = state
        .organizations
        .create(&user.id, &req.name, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// GET /api/organizations - organizations the caller belongs to.
pub async fn list_organizations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Organization>>, AppError> {
    Ok(Json(state.organizations.list_for_user(&user.id).await?))
}

/// POST /api/addAdminToOrg/:org_id - add a member by email.
pub async fn add_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(org_id): Path<OrgId>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_owner(&state, &org_id, &user).await?;
    state.identity.add_member_by_email(&org_id, &req.email).await?;
    Ok(Json(MessageResponse {
        message: "Member added".to_string(),
    }))
}

/// GET /api/conversations/:org_id - every conversation with history.
pub async fn list_conversations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(org_id): Path<OrgId>,
) -> Result<Json<Vec<ConversationWithHistory>>, AppError> {
    ensure_owner(&state, &org_id, &user).await?;
    Ok(Json(state.conversations.list_by_org(&org_id).await?))
}

/// GET /api/dashboard/:org_id - usage aggregates plus engine insights.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(org_id): Path<OrgId>,
) -> Result<Json<DashboardReport>, AppError> {
    ensure_owner(&state, &org_id, &user).await?;
    Ok(Json(state.insights.dashboard(&org_id).await?))
}

/// GET /api/generateApiKey/:org_id - mint (and replace) the org's key.
pub async fn generate_api_key(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(org_id): Path<OrgId>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    ensure_owner(&state, &org_id, &user).await?;
    let api_key = state.identity.issue_api_key(&org_id).await?;
    Ok(Json(ApiKeyResponse { api_key }))
}

/// DELETE /api/deleteApiKey/:api_key - revoke by plaintext; idempotent.
pub async fn delete_api_key(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(api_key): Path<String>,
) -> Result<StatusCode, AppError> {
    state.identity.revoke_api_key(&api_key).await?;
    Ok(StatusCode::NO_CONTENT)
}
