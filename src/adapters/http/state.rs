//! Shared handler state.

use std::sync::Arc;

use crate::application::{
    IdentityService, InsightsService, OrganizationService, QueryPipeline, SourceService,
};
use crate::ports::{ConversationRepository, PolicyRepository};

/// Everything the HTTP handlers need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub organizations: Arc<OrganizationService>,
    pub sources: Arc<SourceService>,
    pub pipeline: Arc<QueryPipeline>,
    pub insights: Arc<InsightsService>,
    pub policies: Arc<dyn PolicyRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
}
