//! Session middleware and the `RequireAuth` extractor.
//!
//! The middleware validates a Bearer token when one is present and
//! injects the resolved user into request extensions; handlers opt in
//! to enforcement with `RequireAuth`. Routes that accept other
//! credentials (the query endpoint's API key) skip the extractor.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::IdentityService;
use crate::domain::foundation::AppError;
use crate::domain::organization::User;

/// The authenticated user for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Validates the Bearer token if present; absence is not an error here,
/// `RequireAuth` rejects later where authentication is mandatory.
pub async fn session_middleware(
    State(identity): State<Arc<IdentityService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        match identity.verify_session(token).await {
            Ok(user) => {
                request.extensions_mut().insert(CurrentUser(user));
            }
            Err(err) => return err.into_response(),
        }
    }

    next.run(request).await
}

/// Extractor that rejects with 401 unless the middleware resolved a
/// user for this request.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(|CurrentUser(user)| RequireAuth(user))
            .ok_or_else(AppError::invalid_token)
    }
}
