//! Request/response bodies for policy endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrgId;

#[derive(Debug, Deserialize)]
pub struct MergeGuardrailsRequest {
    pub org_id: OrgId,
    pub guardrails: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GuardrailsResponse {
    pub guardrails: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPersonaRequest {
    pub org_id: OrgId,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct PersonaResponse {
    pub prompt: Option<String>,
}
