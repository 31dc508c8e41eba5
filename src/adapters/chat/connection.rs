//! Chat connection lifecycle.
//!
//! At most one gateway connection runs at a time. `swap` stops the
//! current one before starting the next, so a reconfiguration never
//! leaves two bots answering the same channel.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::mention::MentionHandler;

/// Owns the zero-or-one running mention loop.
pub struct ConnectionManager {
    current: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Stops any running connection, then starts one for `handler`.
    pub async fn swap(&self, handler: Arc<MentionHandler>) {
        let mut current = self.current.lock().await;
        if let Some(running) = current.take() {
            running.abort();
        }
        *current = Some(tokio::spawn(async move {
            if let Err(err) = handler.run().await {
                tracing::error!("chat connection ended: {}", err);
            }
        }));
    }

    /// Stops the running connection, if any. Idempotent.
    pub async fn stop(&self) {
        if let Some(running) = self.current.lock().await.take() {
            running.abort();
        }
    }

    /// Whether a connection task is currently alive.
    pub async fn is_running(&self) -> bool {
        let mut current = self.current.lock().await;
        match current.as_ref() {
            Some(handle) if !handle.is_finished() => true,
            Some(_) => {
                *current = None;
                false
            }
            None => false,
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::engine::MockReasoningEngine;
    use crate::adapters::memory::{
        InMemoryApiKeyRepository, InMemoryConversationRepository, InMemoryOrganizationRepository,
        InMemoryPolicyRepository, InMemoryUserRepository,
    };
    use crate::application::{IdentityService, QueryPipeline};
    use crate::config::AuthConfig;
    use crate::domain::foundation::OrgId;
    use crate::ports::{ChatError, ChatGateway, MentionEvent};
    use async_trait::async_trait;
    use secrecy::Secret;
    use tokio::sync::mpsc;

    /// Gateway that connects and then idles forever.
    struct IdleGateway;

    #[async_trait]
    impl ChatGateway for IdleGateway {
        async fn run(&self, _events: mpsc::Sender<MentionEvent>) -> Result<(), ChatError> {
            futures::future::pending().await
        }

        async fn start_thread(&self, _: &str, _: &str, _: &str) -> Result<String, ChatError> {
            Ok("thread".to_string())
        }

        async fn post_message(&self, _: &str, _: &str) -> Result<(), ChatError> {
            Ok(())
        }

        async fn reply(&self, _: &str, _: &str, _: &str) -> Result<(), ChatError> {
            Ok(())
        }
    }

    fn idle_handler() -> Arc<MentionHandler> {
        let organizations = Arc::new(InMemoryOrganizationRepository::new());
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
            Arc::new(MockReasoningEngine::answering("ok")),
        ));
        Arc::new(MentionHandler::new(
            Arc::new(IdleGateway),
            pipeline,
            OrgId::new(),
            "acme",
        ))
    }

    #[tokio::test]
    async fn swap_starts_a_connection() {
        let manager = ConnectionManager::new();
        assert!(!manager.is_running().await);

        manager.swap(idle_handler()).await;
        assert!(manager.is_running().await);

        manager.stop().await;
    }

    #[tokio::test]
    async fn swap_replaces_the_previous_connection() {
        let manager = ConnectionManager::new();
        manager.swap(idle_handler()).await;
        manager.swap(idle_handler()).await;
        assert!(manager.is_running().await);

        manager.stop().await;
        tokio::task::yield_now().await;
        assert!(!manager.is_running().await);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let manager = ConnectionManager::new();
        manager.stop().await;
        manager.swap(idle_handler()).await;
        manager.stop().await;
        manager.stop().await;
    }
}
