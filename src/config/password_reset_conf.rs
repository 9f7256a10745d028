use tracing::debug;

use crate::config::{env_parsed, ConfigError};

/// Where the emailed reset link points and how long its token lives
#[derive(Debug, Clone)]
pub struct PasswordResetConfig {
    /// Storefront origin, `CLIENT_URL`
    pub frontend_base_url: String,
    /// The raw token is appended as the last path segment
    pub reset_path: String,
    pub token_expiration_minutes: i64,
    /// Random bytes per token before hex encoding
    pub token_bytes: usize,
}

impl PasswordResetConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = PasswordResetConfig::default();
        let config = PasswordResetConfig {
            frontend_base_url: env_parsed("CLIENT_URL", defaults.frontend_base_url)?,
            reset_path: env_parsed("RESET_PASSWORD_PATH", defaults.reset_path)?,
            token_expiration_minutes: env_parsed("PASSWORD_RESET_EXPIRY_MINUTES", defaults.token_expiration_minutes)?,
            token_bytes: defaults.token_bytes,
        };
        debug!(
            link = %config.reset_url("<token>"),
            minutes = config.token_expiration_minutes,
            "Password reset settings resolved"
        );

        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        PasswordResetConfig::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

        if !self.frontend_base_url.starts_with("http://") && !self.frontend_base_url.starts_with("https://") {
            return invalid("CLIENT_URL must start with http:// or https://");
        }
        if !self.reset_path.starts_with('/') {
            return invalid("RESET_PASSWORD_PATH must start with /");
        }
        if self.token_expiration_minutes <= 0 {
            return invalid("PASSWORD_RESET_EXPIRY_MINUTES must be greater than 0");
        }
        if self.token_bytes < 16 {
            return invalid("Reset tokens need at least 16 random bytes");
        }
        Ok(())
    }

    /// e.g. `http://localhost:5173/reset-password/<token>`
    pub fn reset_url(&self, token: &str) -> String {
        let base = self.frontend_base_url.trim_end_matches('/');
        let path = self.reset_path.trim_end_matches('/');
        format!("{base}{path}/{token}")
    }
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        PasswordResetConfig {
            frontend_base_url: "http://localhost:5173".to_string(),
            reset_path: "/reset-password".to_string(),
            token_expiration_minutes: 10,
            token_bytes: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_url() {
        let config = PasswordResetConfig::from_test_env();
        assert_eq!(config.reset_url("abc123"), "http://localhost:5173/reset-password/abc123");
    }

    #[test]
    fn test_reset_url_trims_slashes() {
        let mut config = PasswordResetConfig::from_test_env();
        config.frontend_base_url = "https://homly.example/".to_string();
        config.reset_path = "/reset-password/".to_string();
        assert_eq!(config.reset_url("t"), "https://homly.example/reset-password/t");
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = PasswordResetConfig::from_test_env();
        config.frontend_base_url = "homly.example".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_expiry_rejected() {
        let mut config = PasswordResetConfig::from_test_env();
        config.token_expiration_minutes = 0;
        assert!(config.validate().is_err());
    }
}
