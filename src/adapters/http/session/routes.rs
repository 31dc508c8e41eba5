use axum::routing::post;
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::register;

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}
