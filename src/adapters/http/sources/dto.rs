//! Request bodies for source endpoints. Responses serialize the domain
//! [`Source`](crate::domain::source::Source) directly.

use serde::Deserialize;

use crate::domain::foundation::OrgId;
use crate::domain::source::SourceConfig;

/// The tagged config shape rejects mismatched type/config pairs during
/// deserialization, before the handler runs.
#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub org_id: OrgId,
    pub name: String,
    #[serde(flatten)]
    pub config: SourceConfig,
}
