//! Policy handlers.

use axum::extract::{Path, State};
use axum::Json;

use crate::adapters::http::guard::ensure_owner;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::AppState;
use crate::domain::foundation::{AppError, OrgId};

use super::dto::{
    GuardrailsResponse, MergeGuardrailsRequest, PersonaResponse, SetPersonaRequest,
};

/// POST /api/guardrails - union new words into the guardrail set and
/// return the merged result.
pub async fn merge_guardrails(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<MergeGuardrailsRequest>,
) -> Result<Json<GuardrailsResponse>, AppError> {
    ensure_owner(&state, &req.org_id, &user).await?;
    state
        .policies
        .merge_guardrails(&req.org_id, &req.guardrails)
        .await?;
    Ok(Json(GuardrailsResponse {
        guardrails: state.policies.guardrails(&req.org_id).await?,
    }))
}

/// GET /api/guardrails/:org_id
pub async fn get_guardrails(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(org_id): Path<OrgId>,
) -> Result<Json<GuardrailsResponse>, AppError> {
    ensure_owner(&state, &org_id, &user).await?;
    Ok(Json(GuardrailsResponse {
        guardrails: state.policies.guardrails(&org_id).await?,
    }))
}

/// POST /api/orgPrompt - replace the persona prompt.
pub async fn set_persona(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SetPersonaRequest>,
) -> Result<Json<PersonaResponse>, AppError> {
    ensure_owner(&state, &req.org_id, &user).await?;
    state
        .policies
        .set_persona_prompt(&req.org_id, &req.prompt)
        .await?;
    Ok(Json(PersonaResponse {
        prompt: Some(req.prompt),
    }))
}

/// GET /api/orgPrompt/:org_id
pub async fn get_persona(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(org_id): Path<OrgId>,
) -> Result<Json<PersonaResponse>, AppError> {
    ensure_owner(&state, &org_id, &user).await?;
    Ok(Json(PersonaResponse {
        prompt: state.policies.persona_prompt(&org_id).await?,
    }))
}
