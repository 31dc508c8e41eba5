//! Chat-bot channel configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for the chat-bot channel. Disabled by default; when
/// enabled a bot token is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Whether to bring up the chat-bot connection at startup.
    #[serde(default)]
    pub enabled: bool,

    /// Bot token used by both the gateway and the REST calls.
    pub bot_token: Option<Secret<String>>,

    /// Organization the bot answers for.
    pub org_id: Option<uuid::Uuid>,

    /// Gateway websocket URL.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl ChatConfig {
    pub fn bot_token(&self) -> Option<&str> {
        self.bot_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled {
            if self.bot_token().map_or(true, str::is_empty) {
                return Err(ValidationError::MissingBotToken);
            }
            if self.org_id.is_none() {
                return Err(ValidationError::MissingRequired("RAGNET__CHAT__ORG_ID"));
            }
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: None,
            org_id: None,
            gateway_url: default_gateway_url(),
            api_base: default_api_base(),
        }
    }
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}
