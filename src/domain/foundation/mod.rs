//! Foundation types shared across the domain: typed ids and errors.

mod errors;
mod ids;

pub use errors::{AppError, ErrorKind};
pub use ids::{ConversationId, MessageId, OrgId, SourceId, UserId};
