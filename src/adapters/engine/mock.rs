//! Mock reasoning engine for tests and local development.
//!
//! Records every call and returns configurable canned results, so the
//! pipeline's "engine invoked exactly once" and failure-path properties
//! can be asserted without a network.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::OrgId;
use crate::ports::{EngineError, InsightsReport, ReasoningEngine};

/// A recorded engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Init { org_id: OrgId },
    Ingest { org_id: OrgId, location: String },
    Query { org_id: OrgId, question: String, prompt: String },
    Insights { org_id: OrgId },
}

/// In-memory ReasoningEngine double.
pub struct MockReasoningEngine {
    calls: Mutex<Vec<EngineCall>>,
    answer: String,
    fail: bool,
}

impl MockReasoningEngine {
    /// A mock that answers every query with `answer`.
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answer: answer.into(),
            fail: false,
        }
    }

    /// A mock whose every call fails as unreachable.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answer: String::new(),
            fail: true,
        }
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: EngineCall) -> Result<(), EngineError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(EngineError::Unreachable("mock engine down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReasoningEngine for MockReasoningEngine {
    async fn init(&self, org_id: &OrgId) -> Result<(), EngineError> {
        self.record(EngineCall::Init { org_id: *org_id })
    }

    async fn ingest_source(&self, org_id: &OrgId, location: &str) -> Result<(), EngineError> {
        self.record(EngineCall::Ingest {
            org_id: *org_id,
            location: location.to_string(),
        })
    }

    async fn query(
        &self,
        org_id: &OrgId,
        question: &str,
        prompt: &str,
    ) -> Result<String, EngineError> {
        self.record(EngineCall::Query {
            org_id: *org_id,
            question: question.to_string(),
            prompt: prompt.to_string(),
        })?;
        Ok(self.answer.clone())
    }

    async fn insights(
        &self,
        org_id: &OrgId,
        _transcript: &str,
    ) -> Result<InsightsReport, EngineError> {
        self.record(EngineCall::Insights { org_id: *org_id })?;
        Ok(InsightsReport::default())
    }
}
