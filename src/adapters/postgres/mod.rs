//! PostgreSQL implementations of the repository ports.

mod api_key_repository;
mod conversation_repository;
mod organization_repository;
mod policy_repository;
mod source_repository;
mod user_repository;

pub use api_key_repository::PostgresApiKeyRepository;
pub use conversation_repository::PostgresConversationRepository;
pub use organization_repository::PostgresOrganizationRepository;
pub use policy_repository::PostgresPolicyRepository;
pub use source_repository::PostgresSourceRepository;
pub use user_repository::PostgresUserRepository;
