use std::env;

use tracing::{debug, info};

use crate::config::{env_parsed, env_required, ConfigError};

/// Signing settings for session tokens
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
    /// Also the `jwt` cookie max-age
    pub expiration_minutes: i64,
    pub jwt_issuer: Option<String>,
}

impl JwtConfig {
    /// `JWT_SECRET` is required; `JWT_EXPIRE_MINUTES` defaults to a week.
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration");

        let config = JwtConfig {
            jwt_secret: env_required("JWT_SECRET")?,
            expiration_minutes: env_parsed("JWT_EXPIRE_MINUTES", 7 * 24 * 60)?,
            jwt_issuer: env::var("JWT_ISSUER").ok().filter(|v| !v.trim().is_empty()),
        };
        debug!(
            secret_len = config.jwt_secret.len(),
            minutes = config.expiration_minutes,
            issuer = ?config.jwt_issuer,
            "JWT settings resolved"
        );

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < 32 {
            return Err(ConfigError::ValidationError("JWT_SECRET must be at least 32 characters long".to_string()));
        }
        if self.expiration_minutes <= 0 {
            return Err(ConfigError::ValidationError("JWT_EXPIRE_MINUTES must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// `TEST_JWT_SECRET` overrides the built-in secret
    pub fn from_test_env() -> Self {
        let mut config = JwtConfig::default();
        if let Ok(secret) = env::var("TEST_JWT_SECRET") {
            config.jwt_secret = secret;
        }
        config
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security_purposes".to_string(),
            expiration_minutes: 10080,
            jwt_issuer: Some("homly-backend".to_string()),
        }
    }
}
