//! Session token configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// JWT session token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing key for session tokens.
    pub jwt_secret: Secret<String>,

    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.expose_secret()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        Ok(())
    }
}

fn default_token_ttl() -> u64 {
    // 24 hours
    86_400
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: Secret::new(secret.to_string()),
            token_ttl_secs: default_token_ttl(),
        }
    }

    #[test]
    fn short_secret_fails_validation() {
        assert!(config("short").validate().is_err());
    }

    #[test]
    fn long_secret_passes_validation() {
        assert!(config("0123456789abcdef0123456789abcdef").validate().is_ok());
    }

    #[test]
    fn secret_is_not_exposed_by_debug() {
        let config = config("0123456789abcdef0123456789abcdef");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("0123456789abcdef"));
    }
}
