use axum::routing::{delete, get, post};
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::{
    add_member, create_organization, dashboard, delete_api_key, generate_api_key,
    list_conversations, list_organizations,
};

pub fn organization_routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization).get(list_organizations))
        .route("/addAdminToOrg/:org_id", post(add_member))
        .route("/conversations/:org_id", get(list_conversations))
        .route("/dashboard/:org_id", get(dashboard))
        .route("/generateApiKey/:org_id", get(generate_api_key))
        .route("/deleteApiKey/:api_key", delete(delete_api_key))
}
