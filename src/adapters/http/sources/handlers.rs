//! Source handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapters::http::guard::ensure_owner;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::AppState;
use crate::domain::foundation::{AppError, OrgId};
use crate::domain::source::Source;

use super::dto::CreateSourceRequest;

/// POST /api/sources - register a source and trigger its first crawl.
pub async fn create_source(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateSourceRequest>,
) -> Result<(StatusCode, Json<Source>), AppError> {
    ensure_owner(&state, &req.org_id, &user).await?;
    let source = state
        .sources
        .register(&req.org_id, &req.name, req.config)
        .await?;
    Ok((StatusCode::CREATED, Json(source)))
}

/// GET /api/sources/:org_id - list the organization's sources.
pub async fn list_sources(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(org_id): Path<OrgId>,
) -> Result<Json<Vec<Source>>, AppError> {
    ensure_owner(&state, &org_id, &user).await?;
    Ok(Json(state.sources.list(&org_id).await?))
}
