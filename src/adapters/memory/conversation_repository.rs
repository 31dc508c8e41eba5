//! In-memory ConversationRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::conversation::{Conversation, Message, Role};
use crate::domain::foundation::{AppError, ConversationId, OrgId};
use crate::ports::{ConversationRepository, ConversationWithHistory, OrgUsage};

/// HashMap-backed conversation and message store.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
    messages: Mutex<Vec<Message>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn history_sync(&self, id: &ConversationId, limit: u32) -> Vec<Message> {
        let mut messages: Vec<(usize, Message)> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.conversation_id == *id)
            .map(|(i, m)| (i, m.clone()))
            .collect();
        // Most-recent-first; equal timestamps fall back to insertion
        // order so the latest append always sorts first.
        messages.sort_by(|(ai, a), (bi, b)| b.created_at.cmp(&a.created_at).then(bi.cmp(ai)));
        messages.truncate(limit as usize);
        messages.into_iter().map(|(_, m)| m).collect()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<(), AppError> {
        self.conversations
            .lock()
            .unwrap()
            .insert(conversation.id, conversation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, AppError> {
        Ok(self.conversations.lock().unwrap().get(id).cloned())
    }

    async fn append_message(&self, message: &Message) -> Result<(), AppError> {
        if !self
            .conversations
            .lock()
            .unwrap()
            .contains_key(&message.conversation_id)
        {
            return Err(AppError::not_found("Conversation", message.conversation_id));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn history(
        &self,
        id: &ConversationId,
        limit: u32,
    ) -> Result<Vec<Message>, AppError> {
        Ok(self.history_sync(id, limit))
    }

    async fn list_by_org(
        &self,
        org_id: &OrgId,
    ) -> Result<Vec<ConversationWithHistory>, AppError> {
        let conversations: Vec<Conversation> = self
            .conversations
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.org_id == *org_id)
            .cloned()
            .collect();
        Ok(conversations
            .into_iter()
            .map(|conversation| {
                let messages = self.history_sync(&conversation.id, 10);
                ConversationWithHistory {
                    conversation,
                    messages,
                }
            })
            .collect())
    }

    async fn usage(&self, org_id: &OrgId) -> Result<OrgUsage, AppError> {
        let conversations = self.conversations.lock().unwrap();
        let messages = self.messages.lock().unwrap();
        let org_conversations: Vec<&Conversation> = conversations
            .values()
            .filter(|c| c.org_id == *org_id)
            .collect();

        let total_queries = messages
            .iter()
            .filter(|m| {
                m.role == Role::User
                    && org_conversations.iter().any(|c| c.id == m.conversation_id)
            })
            .count() as u64;

        let mut callers: Vec<String> = org_conversations
            .iter()
            .map(|c| {
                c.caller
                    .user_id()
                    .map(|u| u.to_string())
                    .or_else(|| c.caller.anonymous_id().map(str::to_string))
                    .unwrap_or_default()
            })
            .collect();
        callers.sort();
        callers.dedup();

        let lengths: Vec<usize> = org_conversations
            .iter()
            .map(|c| {
                messages
                    .iter()
                    .filter(|m| m.conversation_id == c.id)
                    .count()
            })
            .collect();
        let average = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        };

        Ok(OrgUsage {
            total_queries,
            total_users: callers.len() as u64,
            average_conversation_length: average,
        })
    }
}
