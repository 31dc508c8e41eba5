//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `RAGNET`
//! prefix and `__` (double underscore) separating nested sections, e.g.
//! `RAGNET__SERVER__PORT=8080` -> `server.port`.

mod auth;
mod chat;
mod database;
mod engine;
mod error;
mod server;

pub use auth::AuthConfig;
pub use chat::ChatConfig;
pub use database::DatabaseConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Session token configuration (JWT signing key, TTL)
    pub auth: AuthConfig,

    /// Reasoning engine configuration (base URL, service credential)
    pub engine: EngineConfig,

    /// Chat-bot channel configuration (optional)
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from environment variables, reading a `.env`
    /// file first when present (development).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RAGNET")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of all sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.engine.validate()?;
        self.chat.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("RAGNET__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("RAGNET__AUTH__JWT_SECRET", "test-secret-test-secret-test-sec");
        env::set_var("RAGNET__ENGINE__BASE_URL", "http://localhost:9000");
        env::set_var("RAGNET__ENGINE__SERVICE_KEY", "svc-key");
    }

    fn clear_env() {
        env::remove_var("RAGNET__DATABASE__URL");
        env::remove_var("RAGNET__AUTH__JWT_SECRET");
        env::remove_var("RAGNET__ENGINE__BASE_URL");
        env::remove_var("RAGNET__ENGINE__SERVICE_KEY");
        env::remove_var("RAGNET__SERVER__PORT");
        env::remove_var("RAGNET__SERVER__ENVIRONMENT");
    }

    #[test]
    fn loads_and_validates_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_override_marks_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("RAGNET__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }
}
