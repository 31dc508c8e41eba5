//! Mock chat gateway for tests.

use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::ports::{ChatError, ChatGateway, MentionEvent};

/// What the mock observed the handler doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    StartThread {
        channel_id: String,
        message_id: String,
        title: String,
    },
    PostMessage {
        channel_id: String,
        content: String,
    },
    Reply {
        channel_id: String,
        message_id: String,
        content: String,
    },
}

/// Scripted gateway: emits a fixed set of mentions, records every
/// outbound action.
pub struct MockChatGateway {
    mentions: Vec<MentionEvent>,
    actions: Mutex<Vec<ChatAction>>,
    fail_rest: bool,
}

impl MockChatGateway {
    pub fn with_mentions(mentions: Vec<MentionEvent>) -> Self {
        Self {
            mentions,
            actions: Mutex::new(Vec::new()),
            fail_rest: false,
        }
    }

    /// A mock whose REST calls all fail.
    pub fn broken() -> Self {
        Self {
            mentions: Vec::new(),
            actions: Mutex::new(Vec::new()),
            fail_rest: true,
        }
    }

    pub fn actions(&self) -> Vec<ChatAction> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: ChatAction) -> Result<(), ChatError> {
        self.actions.lock().unwrap().push(action);
        if self.fail_rest {
            Err(ChatError::Rest("mock REST failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatGateway for MockChatGateway {
    async fn run(&self, events: mpsc::Sender<MentionEvent>) -> Result<(), ChatError> {
        for mention in &self.mentions {
            if events.send(mention.clone()).await.is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn start_thread(
        &self,
        channel_id: &str,
        message_id: &str,
        title: &str,
    ) -> Result<String, ChatError> {
        self.record(ChatAction::StartThread {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
            title: title.to_string(),
        })?;
        Ok(format!("thread-{}", message_id))
    }

    async fn post_message(&self, channel_id: &str, content: &str) -> Result<(), ChatError> {
        self.record(ChatAction::PostMessage {
            channel_id: channel_id.to_string(),
            content: content.to_string(),
        })
    }

    async fn reply(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<(), ChatError> {
        self.record(ChatAction::Reply {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
            content: content.to_string(),
        })
    }
}
