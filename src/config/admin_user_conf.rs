use crate::config::{env_parsed, env_required, ConfigError};

/// Credentials for the admin account seeded on first start
#[derive(Debug, Clone)]
pub struct AdminUserConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = AdminUserConfig {
            name: env_parsed("ADMIN_USER_NAME", "Admin".to_string())?,
            email: env_required("ADMIN_USER_EMAIL")?,
            password: env_required("ADMIN_USER_PASSWORD")?,
        };
        if config.password.len() < 6 {
            return Err(ConfigError::ValidationError("ADMIN_USER_PASSWORD must be at least 6 characters".to_string()));
        }
        Ok(config)
    }
}
