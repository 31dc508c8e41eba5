//! Registration / login endpoint.

mod dto;
mod handlers;
mod routes;

pub use routes::session_routes;
