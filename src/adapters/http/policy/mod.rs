//! Policy endpoints: guardrails and the persona prompt.

mod dto;
mod handlers;
mod routes;

pub use routes::policy_routes;
