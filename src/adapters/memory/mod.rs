//! In-memory repository implementations.
//!
//! Used by unit and integration tests, and usable for local
//! development without a database. Not suitable for production: no
//! durability, whole-store mutex granularity.

mod api_key_repository;
mod conversation_repository;
mod organization_repository;
mod policy_repository;
mod source_repository;
mod user_repository;

pub use api_key_repository::InMemoryApiKeyRepository;
pub use conversation_repository::InMemoryConversationRepository;
pub use organization_repository::InMemoryOrganizationRepository;
pub use policy_repository::InMemoryPolicyRepository;
pub use source_repository::InMemorySourceRepository;
pub use user_repository::InMemoryUserRepository;
