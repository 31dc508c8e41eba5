//! Chat gateway port.
//!
//! Abstracts the chat platform behind three concerns: a long-lived
//! event feed of bot mentions, opening a reply thread on a message, and
//! posting into a channel or thread. The connection manager and mention
//! handler are written against this trait, so the concrete platform
//! client carries no orchestration logic.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// An inbound message that mentioned the bot, with the mention markup
/// already stripped from the content.
#[derive(Debug, Clone)]
pub struct MentionEvent {
    pub channel_id: String,
    pub message_id: String,
    pub author: String,
    pub content: String,
}

/// Failures of the chat platform connection or its REST calls.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("gateway connection failed: {0}")]
    Connection(String),

    #[error("gateway closed: {0}")]
    Closed(String),

    #[error("chat REST call failed: {0}")]
    Rest(String),
}

/// Long-lived connection to the chat platform plus its reply surface.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Runs the connection, pushing every bot mention into `events`
    /// until the receiver is dropped or the connection dies. Returning
    /// `Ok` means the remote side closed cleanly.
    async fn run(&self, events: mpsc::Sender<MentionEvent>) -> Result<(), ChatError>;

    /// Opens a reply thread on the triggering message and returns the
    /// new thread's channel id.
    async fn start_thread(
        &self,
        channel_id: &str,
        message_id: &str,
        title: &str,
    ) -> Result<String, ChatError>;

    /// Posts a message into a channel or thread.
    async fn post_message(&self, channel_id: &str, content: &str) -> Result<(), ChatError>;

    /// Replies directly to a message (used for the apology path).
    async fn reply(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<(), ChatError>;
}
