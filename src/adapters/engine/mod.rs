//! Reasoning engine adapters: the HTTP client and a mock for tests.

mod http_client;
mod mock;

pub use http_client::HttpReasoningEngine;
pub use mock::{EngineCall, MockReasoningEngine};
