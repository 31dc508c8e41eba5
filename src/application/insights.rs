//! Dashboard analytics service.
//!
//! Combines locally computed usage aggregates with the engine's
//! transcript-derived insights into one report.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{AppError, OrgId};
use crate::ports::{ConversationRepository, InsightsReport, OrgUsage, ReasoningEngine};

/// Everything the dashboard renders for one organization.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    #[serde(flatten)]
    pub usage: OrgUsage,
    pub insights: InsightsReport,
}

pub struct InsightsService {
    conversations: Arc<dyn ConversationRepository>,
    engine: Arc<dyn ReasoningEngine>,
}

impl InsightsService {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        engine: Arc<dyn ReasoningEngine>,
    ) -> Self {
        Self {
            conversations,
            engine,
        }
    }

    /// Builds the dashboard report for an organization.
    ///
    /// With no recorded conversations the engine is not consulted and
    /// the insights section comes back empty.
    pub async fn dashboard(&self, org_id: &OrgId) -> Result<DashboardReport, AppError> {
        let usage = self.conversations.usage(org_id).await?;
        let conversations = self.conversations.list_by_org(org_id).await?;

        let insights = if conversations.is_empty() {
            InsightsReport::default()
        } else {
            let transcript = serialize_transcripts(&conversations);
            self.engine.insights(org_id, &transcript).await?
        };

        Ok(DashboardReport { usage, insights })
    }
}

/// One text block per conversation, turns oldest-first, blocks
/// separated so the engine can tell conversations apart.
fn serialize_transcripts(
    conversations: &[crate::ports::ConversationWithHistory],
) -> String {
    conversations
        .iter()
        .map(|c| {
            c.messages
                .iter()
                .map(|m| format!("{}: {}", m.role.as_str(), m.content))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::engine::{EngineCall, MockReasoningEngine};
    use crate::adapters::memory::InMemoryConversationRepository;
    use crate::domain::conversation::{Conversation, Message, Role};

    #[tokio::test]
    async fn empty_org_skips_the_engine() {
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let engine = Arc::new(MockReasoningEngine::answering("ok"));
        let service = InsightsService::new(conversations, engine.clone());

        let report = service.dashboard(&OrgId::new()).await.unwrap();
        assert_eq!(report.usage.total_queries, 0);
        assert!(report.insights.topics.is_empty());
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn dashboard_aggregates_usage_and_asks_for_insights() {
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let engine = Arc::new(MockReasoningEngine::answering("ok"));
        let service = InsightsService::new(conversations.clone(), engine.clone());

        let org = OrgId::new();
        let conversation = Conversation::start(org, None);
        conversations.create(&conversation).await.unwrap();
        conversations
            .append_message(&Message::new(conversation.id, Role::User, "q1"))
            .await
            .unwrap();
        conversations
            .append_message(&Message::new(conversation.id, Role::Assistant, "a1"))
            .await
            .unwrap();

        let report = service.dashboard(&org).await.unwrap();
        assert_eq!(report.usage.total_queries, 1);
        assert_eq!(report.usage.total_users, 1);
        assert_eq!(engine.calls(), vec![EngineCall::Insights { org_id: org }]);
    }
}
