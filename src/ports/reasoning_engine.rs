//! Reasoning engine port.
//!
//! The external retrieval-and-generation service is opaque beyond four
//! synchronous calls. All of them are at-most-once and non-idempotent:
//! no retry lives behind this trait, and a failure surfaces immediately
//! as a pipeline failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{AppError, OrgId};

/// Structured analytics the engine derives from conversation transcripts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub top_sources: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
}

/// Failures of a reasoning engine call.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("engine unreachable: {0}")]
    Unreachable(String),

    #[error("engine call timed out")]
    Timeout,

    #[error("engine rejected the call with status {status}")]
    Rejected { status: u16 },

    #[error("engine returned an unreadable response: {0}")]
    InvalidResponse(String),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::upstream(err.to_string())
    }
}

/// Stateless adapter to the external reasoning engine.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Provisions engine-side state for a new organization. Called once
    /// at organization creation; failure is fatal to the creation saga.
    async fn init(&self, org_id: &OrgId) -> Result<(), EngineError>;

    /// Triggers the engine to crawl and index a source location.
    /// Failure aborts source registration.
    async fn ingest_source(&self, org_id: &OrgId, location: &str) -> Result<(), EngineError>;

    /// The grounded-answer call: `prompt` is the fully assembled system
    /// instruction block, `question` the latest user turn.
    async fn query(
        &self,
        org_id: &OrgId,
        question: &str,
        prompt: &str,
    ) -> Result<String, EngineError>;

    /// Summarizes serialized transcripts into dashboard analytics.
    async fn insights(
        &self,
        org_id: &OrgId,
        transcript: &str,
    ) -> Result<InsightsReport, EngineError>;
}
