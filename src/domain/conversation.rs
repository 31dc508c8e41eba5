//! Conversation and message entities.
//!
//! A conversation is scoped to an organization and carried by exactly
//! one caller identity: an authenticated user id, or a generated
//! anonymous id that unauthenticated callers reuse on later turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{AppError, ConversationId, MessageId, OrgId, UserId};

/// The continuity key for a conversation: a user or an anonymous handle.
///
/// Exactly one variant holds; the "never both, never neither" invariant
/// is enforced here instead of with a database check constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerIdentity {
    User(UserId),
    Anonymous(String),
}

impl CallerIdentity {
    /// Identity for an unauthenticated caller with a fresh anonymous id.
    pub fn anonymous() -> Self {
        CallerIdentity::Anonymous(Uuid::new_v4().to_string())
    }

    /// Reconstructs an identity from persisted columns.
    pub fn from_columns(
        user_id: Option<UserId>,
        anonymous_id: Option<String>,
    ) -> Result<Self, AppError> {
        match (user_id, anonymous_id) {
            (Some(user), None) => Ok(CallerIdentity::User(user)),
            (None, Some(anon)) => Ok(CallerIdentity::Anonymous(anon)),
            _ => Err(AppError::database(
                "conversation row must carry exactly one of user_id / anonymous_id",
            )),
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            CallerIdentity::User(id) => Some(id),
            CallerIdentity::Anonymous(_) => None,
        }
    }

    pub fn anonymous_id(&self) -> Option<&str> {
        match self {
            CallerIdentity::User(_) => None,
            CallerIdentity::Anonymous(id) => Some(id),
        }
    }
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown message role: {}", other)),
        }
    }
}

/// An org-scoped conversation owning an ordered sequence of messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub org_id: OrgId,
    pub caller: CallerIdentity,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Starts a conversation for the given caller. Unauthenticated
    /// callers get a generated anonymous id as their continuity handle.
    pub fn start(org_id: OrgId, user_id: Option<UserId>) -> Self {
        let caller = match user_id {
            Some(id) => CallerIdentity::User(id),
            None => CallerIdentity::anonymous(),
        };
        Self {
            id: ConversationId::new(),
            org_id,
            caller,
            created_at: Utc::now(),
        }
    }
}

/// A single immutable turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(conversation_id: ConversationId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
