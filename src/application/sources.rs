//! Source registration service.
//!
//! Registration is engine-first like organization creation: the crawl
//! is triggered before the row is inserted, so a source never exists
//! locally without engine-side indexing having at least started. A
//! crawl with no surviving row can happen if the insert fails; the
//! engine tolerates re-ingestion.

use std::sync::Arc;

use crate::domain::foundation::{AppError, OrgId};
use crate::domain::source::{Source, SourceConfig};
use crate::ports::{ReasoningEngine, SourceRepository};

/// Register/list operations for knowledge sources.
pub struct SourceService {
    sources: Arc<dyn SourceRepository>,
    engine: Arc<dyn ReasoningEngine>,
}

impl SourceService {
    pub fn new(sources: Arc<dyn SourceRepository>, engine: Arc<dyn ReasoningEngine>) -> Self {
        Self { sources, engine }
    }

    /// Registers a source and triggers its first crawl.
    ///
    /// The per-organization location uniqueness is checked up front;
    /// the insert's conflict handling backstops the race between two
    /// concurrent registrations of the same location.
    pub async fn register(
        &self,
        org_id: &OrgId,
        name: &str,
        config: SourceConfig,
    ) -> Result<Source, AppError> {
        let mut source = Source::new(*org_id, name, config)?;

        if self
            .sources
            .location_exists(org_id, source.config.location())
            .await?
        {
            return Err(AppError::duplicate_source(source.config.location()));
        }

        self.engine
            .ingest_source(org_id, source.config.location())
            .await?;
        source.last_sync_at = Some(chrono::Utc::now());

        self.sources.create(&source).await?;
        tracing::info!(
            org_id = %org_id,
            source_id = %source.id,
            kind = source.config.kind().as_str(),
            "source registered"
        );
        Ok(source)
    }

    pub async fn list(&self, org_id: &OrgId) -> Result<Vec<Source>, AppError> {
        self.sources.list_by_org(org_id).await
    }
}
