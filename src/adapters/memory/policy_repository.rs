//! In-memory PolicyRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{AppError, OrgId};
use crate::domain::policy::PolicyPreferences;
use crate::ports::PolicyRepository;

/// HashMap-backed policy preference store.
#[derive(Default)]
pub struct InMemoryPolicyRepository {
    prefs: Mutex<HashMap<OrgId, PolicyPreferences>>,
}

impl InMemoryPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyRepository for InMemoryPolicyRepository {
    async fn merge_guardrails(&self, org_id: &OrgId, words: &[String]) -> Result<(), AppError> {
        if words.is_empty() {
            return Ok(());
        }
        let mut prefs = self.prefs.lock().unwrap();
        let entry = prefs
            .entry(*org_id)
            .or_insert_with(|| PolicyPreferences::empty(*org_id));
        for word in words {
            if !entry.guardrails.contains(word) {
                entry.guardrails.push(word.clone());
            }
        }
        Ok(())
    }

    async fn guardrails(&self, org_id: &OrgId) -> Result<Vec<String>, AppError> {
        Ok(self
            .prefs
            .lock()
            .unwrap()
            .get(org_id)
            .map(|p| p.guardrails.clone())
            .unwrap_or_default())
    }

    async fn set_persona_prompt(&self, org_id: &OrgId, prompt: &str) -> Result<(), AppError> {
        let mut prefs = self.prefs.lock().unwrap();
        let entry = prefs
            .entry(*org_id)
            .or_insert_with(|| PolicyPreferences::empty(*org_id));
        entry.persona_prompt = Some(prompt.to_string());
        Ok(())
    }

    async fn persona_prompt(&self, org_id: &OrgId) -> Result<Option<String>, AppError> {
        Ok(self
            .prefs
            .lock()
            .unwrap()
            .get(org_id)
            .and_then(|p| p.persona_prompt.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guardrails_default_to_empty() {
        let repo = InMemoryPolicyRepository::new();
        assert!(repo.guardrails(&OrgId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn merge_unions_without_duplicates() {
        let repo = InMemoryPolicyRepository::new();
        let org = OrgId::new();
        repo.merge_guardrails(&org, &["a".into(), "b".into()])
            .await
            .unwrap();
        repo.merge_guardrails(&org, &["b".into(), "c".into()])
            .await
            .unwrap();

        let mut guardrails = repo.guardrails(&org).await.unwrap();
        guardrails.sort();
        assert_eq!(guardrails, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn persona_prompt_replaces_on_write() {
        let repo = InMemoryPolicyRepository::new();
        let org = OrgId::new();
        assert!(repo.persona_prompt(&org).await.unwrap().is_none());

        repo.set_persona_prompt(&org, "formal").await.unwrap();
        repo.set_persona_prompt(&org, "friendly and terse").await.unwrap();
        assert_eq!(
            repo.persona_prompt(&org).await.unwrap().as_deref(),
            Some("friendly and terse")
        );
    }
}
