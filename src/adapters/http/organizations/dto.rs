//! Request/response bodies for organization endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    /// Plaintext key, returned exactly once.
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
