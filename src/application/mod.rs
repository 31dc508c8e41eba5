//! Application layer: services composing the ports into the operations
//! the channel adapters expose.

pub mod auth_state;
pub mod identity;
pub mod insights;
pub mod orchestrator;
pub mod organizations;
pub mod sources;

pub use auth_state::{AuthStateRecord, AuthStateStore};
pub use identity::IdentityService;
pub use insights::{DashboardReport, InsightsService};
pub use orchestrator::{Answer, Credential, QueryPipeline, QueryRequest};
pub use organizations::OrganizationService;
pub use sources::SourceService;
