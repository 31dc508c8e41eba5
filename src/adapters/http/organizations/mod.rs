//! Organization management endpoints: create/list, membership,
//! conversations, dashboard, and the API key lifecycle.

mod dto;
mod handlers;
mod routes;

pub use routes::organization_routes;
