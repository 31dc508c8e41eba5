//! The query endpoint: one exchange with an organization's assistant.

mod dto;
mod handlers;
mod routes;

pub use routes::query_routes;
