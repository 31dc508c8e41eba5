//! Adapters: concrete implementations of the ports.

pub mod chat;
pub mod engine;
pub mod http;
pub mod memory;
pub mod postgres;
