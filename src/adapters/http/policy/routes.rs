use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::{get_guardrails, get_persona, merge_guardrails, set_persona};

pub fn policy_routes() -> Router<AppState> {
    Router::new()
        .route("/guardrails", post(merge_guardrails))
        .route("/guardrails/:org_id", get(get_guardrails))
        .route("/orgPrompt", post(set_persona))
        .route("/orgPrompt/:org_id", get(get_persona))
}
