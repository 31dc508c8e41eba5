//! HTTP channel adapter: axum routes, handlers, DTOs, middleware.
//!
//! Each route group keeps its DTOs and handlers together; `routes`
//! assembles the full API router over a shared `AppState`.

pub mod error;
pub mod guard;
pub mod middleware;
pub mod state;

pub mod organizations;
pub mod policy;
pub mod query;
pub mod session;
pub mod sources;

mod routes;

pub use routes::app_router;
pub use state::AppState;
