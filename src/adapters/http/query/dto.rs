//! Request body for the query endpoint. The response is the
//! application-level [`Answer`](crate::application::Answer) serialized
//! as-is.

use serde::Deserialize;

use crate::domain::foundation::{ConversationId, OrgId};

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub org_id: OrgId,
    pub question: String,
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    #[serde(default)]
    pub anonymous_id: Option<String>,
}
