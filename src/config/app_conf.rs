use chrono::FixedOffset;
use tracing::{debug, info};

use crate::config::{env_parsed, ConfigError};

/// HTTP server and deployment settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `production` switches auth cookies to `Secure; SameSite=None`
    pub environment: String,
    /// Storefront origin, used for CORS and links sent by email
    pub client_url: String,
    /// Offset of the stores' wall clock from UTC, in minutes
    pub utc_offset_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading application configuration");

        let defaults = AppConfig::default();
        let config = AppConfig {
            host: env_parsed("APP_HOST", defaults.host)?,
            port: env_parsed("APP_PORT", defaults.port)?,
            environment: env_parsed("APP_ENV", defaults.environment)?,
            client_url: env_parsed("CLIENT_URL", defaults.client_url)?,
            utc_offset_minutes: env_parsed("STORE_UTC_OFFSET_MINUTES", defaults.utc_offset_minutes)?,
        };
        debug!(
            addr = %format!("{}:{}", config.host, config.port),
            env = %config.environment,
            client = %config.client_url,
            "Application settings resolved"
        );

        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_url: "http://localhost:5173".to_string(),
            utc_offset_minutes: 330,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationError("APP_HOST cannot be empty".to_string()));
        }
        if !self.client_url.starts_with("http://") && !self.client_url.starts_with("https://") {
            return Err(ConfigError::ValidationError("CLIENT_URL must start with http:// or https://".to_string()));
        }
        if self.local_offset().is_none() {
            return Err(ConfigError::ValidationError("STORE_UTC_OFFSET_MINUTES is out of range".to_string()));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn local_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: "development".to_string(),
            client_url: "http://localhost:5173".to_string(),
            utc_offset_minutes: 330,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
        assert_eq!(config.local_offset(), FixedOffset::east_opt(330 * 60));
    }

    #[test]
    fn test_rejects_client_url_without_scheme() {
        let mut config = AppConfig::from_test_env();
        config.client_url = "localhost:5173".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_offset() {
        let mut config = AppConfig::from_test_env();
        config.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_flag() {
        let mut config = AppConfig::from_test_env();
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
