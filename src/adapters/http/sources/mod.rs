//! Source registration endpoints.

mod dto;
mod handlers;
mod routes;

pub use routes::source_routes;
