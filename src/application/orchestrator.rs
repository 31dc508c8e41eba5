//! Query orchestration pipeline.
//!
//! One exchange runs the same six steps regardless of channel: resolve
//! the caller, resolve or start the conversation, persist the user
//! turn, compose the policy-bound prompt from history and preferences,
//! call the engine exactly once, persist and return the answer.
//!
//! The user turn is persisted before the engine call, so a failed
//! exchange still leaves the question in the transcript. All
//! authorization and lookup failures short-circuit before anything is
//! written.

use std::sync::Arc;

use crate::domain::conversation::{CallerIdentity, Conversation, Message, Role};
use crate::domain::foundation::{AppError, ConversationId, OrgId};
use crate::domain::prompt::{self, PromptContext};
use crate::ports::{
    ConversationRepository, OrganizationRepository, PolicyRepository, ReasoningEngine,
};

use super::identity::IdentityService;

/// Turns of prior context embedded in the prompt.
const HISTORY_LIMIT: u32 = 10;

/// How the caller proved who they are.
#[derive(Debug)]
pub enum Credential {
    /// Per-organization API key (widget and programmatic callers).
    ApiKey(String),
    /// Session token of a registered user.
    Session(String),
    /// Trusted in-process caller, e.g. the chat bot.
    Internal,
}

/// One question addressed to an organization's assistant.
pub struct QueryRequest {
    pub org_id: OrgId,
    pub question: String,
    /// Continue this conversation; `None` starts a fresh one.
    pub conversation_id: Option<ConversationId>,
    /// Continuity handle from a previous anonymous exchange.
    pub anonymous_id: Option<String>,
}

/// A completed exchange.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Answer {
    pub answer: String,
    pub conversation_id: ConversationId,
    /// Present when the caller is anonymous, so the next request can
    /// reuse the same continuity handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_id: Option<String>,
}

/// The conversation orchestrator.
pub struct QueryPipeline {
    identity: Arc<IdentityService>,
    organizations: Arc<dyn OrganizationRepository>,
    conversations: Arc<dyn ConversationRepository>,
    policies: Arc<dyn PolicyRepository>,
    engine: Arc<dyn ReasoningEngine>,
}

impl QueryPipeline {
    pub fn new(
        identity: Arc<IdentityService>,
        organizations: Arc<dyn OrganizationRepository>,
        conversations: Arc<dyn ConversationRepository>,
        policies: Arc<dyn PolicyRepository>,
        engine: Arc<dyn ReasoningEngine>,
    ) -> Self {
        Self {
            identity,
            organizations,
            conversations,
            policies,
            engine,
        }
    }

    /// Runs one full exchange.
    pub async fn run(
        &self,
        credential: Credential,
        request: QueryRequest,
    ) -> Result<Answer, AppError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(AppError::validation("question is required"));
        }

        let organization = self
            .organizations
            .find_by_id(&request.org_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization", request.org_id))?;

        let caller = self.resolve_caller(credential, &request).await?;

        let conversation = self
            .resolve_conversation(&request, caller.clone())
            .await?;

        self.conversations
            .append_message(&Message::new(conversation.id, Role::User, question))
            .await?;

        let history = self
            .conversations
            .history(&conversation.id, HISTORY_LIMIT)
            .await?;
        let guardrails = self.policies.guardrails(&request.org_id).await?;
        let persona = self.policies.persona_prompt(&request.org_id).await?;

        let prompt = prompt::compose(&PromptContext {
            org_name: &organization.name,
            persona_prompt: persona.as_deref(),
            guardrails: &guardrails,
            history: &history,
        });

        let answer = self
            .engine
            .query(&request.org_id, question, &prompt)
            .await?;

        self.conversations
            .append_message(&Message::new(conversation.id, Role::Assistant, &answer))
            .await?;

        tracing::debug!(
            org_id = %request.org_id,
            conversation_id = %conversation.id,
            "exchange completed"
        );

        Ok(Answer {
            answer,
            conversation_id: conversation.id,
            anonymous_id: conversation.caller.anonymous_id().map(str::to_string),
        })
    }

    /// Authenticates the credential and produces the caller identity.
    ///
    /// An API key only grants access to the organization it was issued
    /// for. Key-authenticated and internal callers are anonymous; a
    /// supplied anonymous id is reused, otherwise a fresh one is
    /// generated at conversation start.
    async fn resolve_caller(
        &self,
        credential: Credential,
        request: &QueryRequest,
    ) -> Result<CallerIdentity, AppError> {
        match credential {
            Credential::Session(token) => {
                let user = self.identity.verify_session(&token).await?;
                Ok(CallerIdentity::User(user.id))
            }
            Credential::ApiKey(key) => {
                if !self.identity.verify_api_key(&key, &request.org_id).await? {
                    return Err(AppError::unauthorized(
                        "API key is not valid for this organization",
                    ));
                }
                Ok(self.anonymous_identity(request))
            }
            Credential::Internal => Ok(self.anonymous_identity(request)),
        }
    }

    fn anonymous_identity(&self, request: &QueryRequest) -> CallerIdentity {
        match &request.anonymous_id {
            Some(id) => CallerIdentity::Anonymous(id.clone()),
            None => CallerIdentity::anonymous(),
        }
    }

    /// Loads the requested conversation or starts a fresh one.
    ///
    /// A stale or foreign conversation id fails with NotFound rather
    /// than silently starting over; a conversation never migrates
    /// between organizations.
    async fn resolve_conversation(
        &self,
        request: &QueryRequest,
        caller: CallerIdentity,
    ) -> Result<Conversation, AppError> {
        if let Some(id) = &request.conversation_id {
            let conversation = self
                .conversations
                .find_by_id(id)
                .await?
                .filter(|c| c.org_id == request.org_id)
                .ok_or_else(|| AppError::not_found("Conversation", id))?;
            return Ok(conversation);
        }

        let conversation = Conversation {
            caller,
            ..Conversation::start(request.org_id, None)
        };
        self.conversations.create(&conversation).await?;
        Ok(conversation)
    }
}
