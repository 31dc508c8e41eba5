//! Ragnet - Multi-Tenant DevRel Assistant Backend
//!
//! This crate implements the conversation orchestration layer for a
//! documentation assistant: organizations register knowledge sources,
//! converse with an engine-grounded assistant, and enforce per-tenant
//! policy (persona, guardrails) on every exchange.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
