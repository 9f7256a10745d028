use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, info};

use crate::config::{env_parsed, is_placeholder, ConfigError};

/// Telegram Bot API settings for admin chat notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Base URL of the Bot API, overridable for tests
    pub api_base: String,
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Loads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    ///
    /// Returns `EnvVarNotFound` when either is missing or still a template placeholder,
    /// callers treat that as "Telegram disabled".
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading Telegram configuration from environment variables");

        let bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|v| !is_placeholder(v))
            .ok_or_else(|| ConfigError::EnvVarNotFound("TELEGRAM_BOT_TOKEN".to_string()))?;
        debug!("Telegram bot token loaded ({} chars)", bot_token.len());

        let chat_id = env::var("TELEGRAM_CHAT_ID")
            .ok()
            .filter(|v| !is_placeholder(v))
            .ok_or_else(|| ConfigError::EnvVarNotFound("TELEGRAM_CHAT_ID".to_string()))?;
        debug!("Telegram chat id: {}", chat_id);

        let config = TelegramConfig {
            bot_token,
            chat_id,
            api_base: env_parsed("TELEGRAM_API_BASE", "https://api.telegram.org".to_string())?,
            timeout_secs: env_parsed("TELEGRAM_TIMEOUT", 10u64)?,
        };
        config.validate()?;
        info!("Telegram configuration loaded successfully");
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        TelegramConfig {
            bot_token: "123456:test-token".to_string(),
            chat_id: "-100200300".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_placeholder(&self.bot_token) || is_placeholder(&self.chat_id) {
            return Err(ConfigError::ValidationError("Telegram token and chat id must be set".to_string()));
        }
        if self.api_base.ends_with('/') {
            return Err(ConfigError::ValidationError("TELEGRAM_API_BASE must not end with '/'".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("Telegram timeout cannot be 0".to_string()));
        }
        Ok(())
    }

    pub fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        let config = TelegramConfig::from_test_env();
        assert_eq!(config.send_message_url(), "http://127.0.0.1:9/bot123456:test-token/sendMessage");
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let mut config = TelegramConfig::from_test_env();
        config.bot_token = "YOUR_BOT_TOKEN".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trailing_slash_rejected() {
        let mut config = TelegramConfig::from_test_env();
        config.api_base = "https://api.telegram.org/".to_string();
        assert!(config.validate().is_err());
    }
}
