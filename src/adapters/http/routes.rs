//! Top-level router assembly.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::middleware::session_middleware;
use super::organizations::organization_routes;
use super::policy::policy_routes;
use super::query::query_routes;
use super::session::session_routes;
use super::sources::source_routes;
use super::AppState;

/// Builds the full application router.
pub fn app_router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .merge(session_routes())
        .merge(query_routes())
        .merge(organization_routes())
        .merge(source_routes())
        .merge(policy_routes())
        .layer(middleware::from_fn_with_state(
            state.identity.clone(),
            session_middleware,
        ));

    Router::new()
        .nest("/api", api)
        .route("/version", get(version))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
