//! Chat-bot channel adapter.
//!
//! The gateway trait lives in `ports`; this module provides the
//! Discord implementation, the mention handler that drives the query
//! pipeline, the connection lifecycle, and a scripted mock.

mod connection;
mod discord;
mod mention;
mod mock;
mod title;

pub use connection::ConnectionManager;
pub use discord::DiscordGateway;
pub use mention::MentionHandler;
pub use mock::{ChatAction, MockChatGateway};
pub use title::derive_title;
