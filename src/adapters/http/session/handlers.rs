//! Session handlers.

use axum::extract::State;
use axum::Json;

use crate::adapters::http::AppState;
use crate::domain::foundation::AppError;

use super::dto::{RegisterRequest, TokenResponse};

/// POST /api/register - register-or-login, returns a session token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.identity.authenticate(&req.email, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}
