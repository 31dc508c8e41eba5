//! Domain layer: entities, value objects, and pure composition logic.

pub mod conversation;
pub mod foundation;
pub mod organization;
pub mod policy;
pub mod prompt;
pub mod source;
