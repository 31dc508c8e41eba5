//! Conversation repository port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{AppError, ConversationId, OrgId};

/// A conversation with its bounded recent history embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationWithHistory {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Per-organization usage aggregates for the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OrgUsage {
    /// Messages asked by callers (role = user) across the org.
    pub total_queries: u64,
    /// Distinct caller identities (user or anonymous) seen.
    pub total_users: u64,
    /// Average number of messages per conversation.
    pub average_conversation_length: f64,
}

/// Persistence contract for conversations and their messages.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn create(&self, conversation: &Conversation) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, AppError>;

    /// Appends one turn as an independent atomic insert; ordering is
    /// established by persisted creation time.
    async fn append_message(&self, message: &Message) -> Result<(), AppError>;

    /// Most-recent-first retrieval bounded by `limit`.
    async fn history(
        &self,
        id: &ConversationId,
        limit: u32,
    ) -> Result<Vec<Message>, AppError>;

    /// All conversations for an organization with embedded histories.
    /// Histories are fetched independently per conversation; no
    /// join-level atomicity across the batch.
    async fn list_by_org(
        &self,
        org_id: &OrgId,
    ) -> Result<Vec<ConversationWithHistory>, AppError>;

    async fn usage(&self, org_id: &OrgId) -> Result<OrgUsage, AppError>;
}
