//! Policy repository port.

use async_trait::async_trait;

use crate::domain::foundation::{AppError, OrgId};

/// Persistence contract for per-organization policy preferences.
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Unions the supplied words into the stored guardrail set
    /// (case-sensitive, exact-string dedup). No-op on empty input.
    async fn merge_guardrails(&self, org_id: &OrgId, words: &[String]) -> Result<(), AppError>;

    /// The guardrail set; empty if none were ever written.
    async fn guardrails(&self, org_id: &OrgId) -> Result<Vec<String>, AppError>;

    /// Replaces the persona prompt.
    async fn set_persona_prompt(&self, org_id: &OrgId, prompt: &str) -> Result<(), AppError>;

    async fn persona_prompt(&self, org_id: &OrgId) -> Result<Option<String>, AppError>;
}
