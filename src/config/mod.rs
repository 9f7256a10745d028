use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{debug, error};

pub mod app_conf;
pub mod admin_user_conf;
pub mod cloudinary_conf;
pub mod email_conf;
pub mod jwt_conf;
pub mod mongo_conf;
pub mod password_reset_conf;
pub mod telegram_conf;

pub use app_conf::AppConfig;
pub use cloudinary_conf::CloudinaryConfig;
pub use email_conf::EmailConfig;
pub use jwt_conf::JwtConfig;
pub use mongo_conf::MongoConfig;
pub use password_reset_conf::PasswordResetConfig;
pub use telegram_conf::TelegramConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Reads `name`, falling back to `default` when unset or blank. A value that
/// is present but does not parse is an error rather than a silent default.
pub(crate) fn env_parsed<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
{
    match env::var(name).ok().filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            error!("{} has an unparseable value", name);
            ConfigError::ParseError(format!("Invalid {} value", name))
        }),
        None => {
            debug!("{} not set, using {}", name, default);
            Ok(default)
        }
    }
}

pub(crate) fn env_required(name: &str) -> Result<String, ConfigError> {
    env::var(name).ok().filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        error!("{} environment variable not found", name);
        ConfigError::EnvVarNotFound(name.to_string())
    })
}

/// True for values left over from `.env.example` style templates.
pub(crate) fn is_placeholder(value: &str) -> bool {
    let upper = value.trim().to_ascii_uppercase();
    upper.is_empty() || upper.starts_with("YOUR_") || upper.starts_with("REPLACE_") || upper == "CHANGEME"
}
