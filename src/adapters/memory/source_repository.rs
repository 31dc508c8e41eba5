//! In-memory SourceRepository.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{AppError, OrgId};
use crate::domain::source::Source;
use crate::ports::SourceRepository;

/// Vec-backed source store.
#[derive(Default)]
pub struct InMemorySourceRepository {
    sources: Mutex<Vec<Source>>,
}

impl InMemorySourceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SourceRepository for InMemorySourceRepository {
    async fn create(&self, source: &Source) -> Result<(), AppError> {
        let mut sources = self.sources.lock().unwrap();
        if sources
            .iter()
            .any(|s| s.org_id == source.org_id && s.config.location() == source.config.location())
        {
            return Err(AppError::duplicate_source(source.config.location()));
        }
        sources.push(source.clone());
        Ok(())
    }

    async fn location_exists(&self, org_id: &OrgId, location: &str) -> Result<bool, AppError> {
        Ok(self
            .sources
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.org_id == *org_id && s.config.location() == location))
    }

    async fn list_by_org(&self, org_id: &OrgId) -> Result<Vec<Source>, AppError> {
        Ok(self
            .sources
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.org_id == *org_id)
            .cloned()
            .collect())
    }
}
