//! Mention handling: one pipeline run per bot mention.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::{Credential, QueryPipeline, QueryRequest};
use crate::domain::foundation::{AppError, OrgId};
use crate::ports::{ChatError, ChatGateway, MentionEvent};

use super::title::derive_title;

const APOLOGY: &str =
    "Sorry, I couldn't answer that right now. Please try again in a little while.";

/// Buffered mentions awaiting a handler task.
const EVENT_BUFFER: usize = 64;

/// Answers bot mentions for one organization.
///
/// Every mention starts a fresh conversation; thread replies do not
/// carry context between mentions.
pub struct MentionHandler {
    gateway: Arc<dyn ChatGateway>,
    pipeline: Arc<QueryPipeline>,
    org_id: OrgId,
    org_name: String,
}

impl MentionHandler {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        pipeline: Arc<QueryPipeline>,
        org_id: OrgId,
        org_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            pipeline,
            org_id,
            org_name: org_name.into(),
        }
    }

    /// Consumes the gateway's mention feed until it closes. Mentions
    /// are handled concurrently; a slow engine call never blocks the
    /// feed.
    pub async fn run(self: Arc<Self>) -> Result<(), ChatError> {
        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        let gateway = self.gateway.clone();
        let feed = tokio::spawn(async move { gateway.run(tx).await });

        while let Some(mention) = rx.recv().await {
            let handler = self.clone();
            tokio::spawn(async move {
                handler.handle(mention).await;
            });
        }

        match feed.await {
            Ok(result) => result,
            Err(err) => Err(ChatError::Closed(format!("gateway task panicked: {}", err))),
        }
    }

    /// One mention: open a titled thread and answer inside it. Any
    /// failure downgrades to an apology reply on the original message.
    pub async fn handle(&self, mention: MentionEvent) {
        if let Err(err) = self.answer_in_thread(&mention).await {
            tracing::warn!(
                channel_id = %mention.channel_id,
                author = %mention.author,
                "mention handling failed: {}",
                err
            );
            if let Err(err) = self
                .gateway
                .reply(&mention.channel_id, &mention.message_id, APOLOGY)
                .await
            {
                tracing::error!("apology reply failed: {}", err);
            }
        }
    }

    async fn answer_in_thread(&self, mention: &MentionEvent) -> Result<(), AppError> {
        let title = derive_title(&mention.content, &self.org_name);
        let thread_id = self
            .gateway
            .start_thread(&mention.channel_id, &mention.message_id, &title)
            .await
            .map_err(|e| AppError::upstream(e.to_string()))?;

        let answer = self
            .pipeline
            .run(
                Credential::Internal,
                QueryRequest {
                    org_id: self.org_id,
                    question: mention.content.clone(),
                    conversation_id: None,
                    anonymous_id: Some(format!("chat:{}", mention.author)),
                },
            )
            .await?;

        self.gateway
            .post_message(&thread_id, &answer.answer)
            .await
            .map_err(|e| AppError::upstream(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chat::mock::{ChatAction, MockChatGateway};
    use crate::adapters::engine::MockReasoningEngine;
    use crate::adapters::memory::{
        InMemoryApiKeyRepository, InMemoryConversationRepository, InMemoryOrganizationRepository,
        InMemoryPolicyRepository, InMemoryUserRepository,
    };
    use crate::application::IdentityService;
    use crate::config::AuthConfig;
    use crate::ports::OrganizationRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::organization::Organization;
    use secrecy::Secret;

    async fn pipeline(engine: MockReasoningEngine) -> (Arc<QueryPipeline>, Organization) {
        let organizations = Arc::new(InMemoryOrganizationRepository::new());
        let org = Organization::new("acme", "");
        organizations
            .create_with_owner(&org, &UserId::new())
            .await
            .unwrap();

        let identity = Arc::new(IdentityService::new(
            Arc::new(InMemoryUserRepository::new()),
            organizations.clone(),
            Arc::new(InMemoryApiKeyRepository::new()),
            AuthConfig {
                jwt_secret: Secret::new("0123456789abcdef0123456789abcdef".to_string()),
                token_ttl_secs: 3600,
            },
        ));

        let pipeline = Arc::new(QueryPipeline::new(
            identity,
            organizations,
            Arc::new(InMemoryConversationRepository::new()),
            Arc::new(InMemoryPolicyRepository::new()),
            Arc::new(engine),
        ));
        (pipeline, org)
    }

    fn mention(content: &str) -> MentionEvent {
        MentionEvent {
            channel_id: "chan-1".to_string(),
            message_id: "msg-1".to_string(),
            author: "ada".to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn mention_opens_a_titled_thread_and_posts_the_answer() {
        let (pipeline, org) = pipeline(MockReasoningEngine::answering("check the docs")).await;
        let gateway = Arc::new(MockChatGateway::with_mentions(vec![]));
        let handler = MentionHandler::new(gateway.clone(), pipeline, org.id, &org.name);

        handler.handle(mention("how do I rotate keys safely?")).await;

        let actions = gateway.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0],
            ChatAction::StartThread {
                channel_id: "chan-1".to_string(),
                message_id: "msg-1".to_string(),
                title: "how do I rotate keys".to_string(),
            }
        );
        assert_eq!(
            actions[1],
            ChatAction::PostMessage {
                channel_id: "thread-msg-1".to_string(),
                content: "check the docs".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn pipeline_failure_becomes_an_apology_reply() {
        let (pipeline, org) = pipeline(MockReasoningEngine::failing()).await;
        let gateway = Arc::new(MockChatGateway::with_mentions(vec![]));
        let handler = MentionHandler::new(gateway.clone(), pipeline, org.id, &org.name);

        handler.handle(mention("anything")).await;

        let actions = gateway.actions();
        assert!(matches!(
            actions.last(),
            Some(ChatAction::Reply { content, .. }) if content == APOLOGY
        ));
    }

    #[tokio::test]
    async fn handle_survives_a_gateway_where_even_the_apology_fails() {
        let (pipeline, org) = pipeline(MockReasoningEngine::answering("unreachable")).await;
        let gateway = Arc::new(MockChatGateway::broken());
        let handler = MentionHandler::new(gateway.clone(), pipeline, org.id, &org.name);

        // start_thread fails, then the apology reply fails too; the
        // handler logs both and returns normally.
        handler.handle(mention("is the api down right now?")).await;

        let actions = gateway.actions();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], ChatAction::StartThread { .. }));
        assert!(matches!(
            &actions[1],
            ChatAction::Reply { content, .. } if content == APOLOGY
        ));
    }

    #[tokio::test]
    async fn run_drains_the_feed_and_answers_each_mention() {
        let (pipeline, org) = pipeline(MockReasoningEngine::answering("answered")).await;
        let gateway = Arc::new(MockChatGateway::with_mentions(vec![
            mention("first question here"),
            MentionEvent {
                message_id: "msg-2".to_string(),
                ..mention("second question here")
            },
        ]));
        let handler = Arc::new(MentionHandler::new(
            gateway.clone(),
            pipeline,
            org.id,
            &org.name,
        ));

        handler.run().await.unwrap();
        // Handler tasks are spawned; give them a moment to finish.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let threads = gateway
            .actions()
            .into_iter()
            .filter(|a| matches!(a, ChatAction::StartThread { .. }))
            .count();
        assert_eq!(threads, 2);
    }
}
