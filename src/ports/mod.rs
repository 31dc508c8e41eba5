//! Ports: async traits at every seam between the core and the world.
//!
//! Repository ports abstract the relational store; the reasoning engine
//! and chat gateway ports abstract the two remote collaborators.

mod api_key_repository;
mod chat_gateway;
mod conversation_repository;
mod organization_repository;
mod policy_repository;
mod reasoning_engine;
mod source_repository;
mod user_repository;

pub use api_key_repository::ApiKeyRepository;
pub use chat_gateway::{ChatError, ChatGateway, MentionEvent};
pub use conversation_repository::{ConversationRepository, ConversationWithHistory, OrgUsage};
pub use organization_repository::OrganizationRepository;
pub use policy_repository::PolicyRepository;
pub use reasoning_engine::{EngineError, InsightsReport, ReasoningEngine};
pub use source_repository::SourceRepository;
pub use user_repository::UserRepository;
