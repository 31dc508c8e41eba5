use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::{create_source, list_sources};

pub fn source_routes() -> Router<AppState> {
    Router::new()
        .route("/sources", post(create_source))
        .route("/sources/:org_id", get(list_sources))
}
