//! Reasoning engine client configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the outbound reasoning engine client.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine, e.g. `http://engine:9000`.
    pub base_url: String,

    /// Shared service credential sent on every call.
    pub service_key: Secret<String>,

    /// Timeout applied to every engine call.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn service_key(&self) -> &str {
        self.service_key.expose_secret()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("ENGINE_BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidEngineUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    60
}
