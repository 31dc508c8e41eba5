use axum::routing::post;
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::query;

pub fn query_routes() -> Router<AppState> {
    Router::new().route("/query", post(query))
}
