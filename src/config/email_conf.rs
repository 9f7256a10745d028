use std::env;

use tracing::{debug, info, warn};

use crate::config::{env_parsed, env_required, ConfigError};

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (Brevo on 587)
    StartTls,
    /// TLS from the first byte (465)
    Wrapper,
    /// Local relays such as MailHog
    Plain,
}

/// SMTP settings for outgoing mail. `notify_to` receives the order and
/// service-request notifications; password reset mail goes to the user.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub use_tls: bool,
    pub use_starttls: bool,
    pub from_email: String,
    pub from_name: String,
    pub connection_timeout_secs: u64,
    pub notify_to: Option<String>,
}

impl EmailConfig {
    /// Fails when credentials or the sender address are missing; the caller
    /// then runs without email.
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading SMTP configuration");
        let defaults = EmailConfig::default();

        let notify_to = env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty());
        if notify_to.is_none() {
            warn!("ADMIN_EMAIL not set, order and service notifications will not be emailed");
        }

        let config = EmailConfig {
            smtp_host: env_parsed("SMTP_HOST", defaults.smtp_host)?,
            smtp_port: env_parsed("SMTP_PORT", defaults.smtp_port)?,
            smtp_username: env_required("SMTP_USERNAME")?,
            smtp_password: env_required("SMTP_PASSWORD")?,
            use_tls: env_parsed("SMTP_USE_TLS", defaults.use_tls)?,
            use_starttls: env_parsed("SMTP_USE_STARTTLS", defaults.use_starttls)?,
            from_email: env_required("SMTP_FROM_EMAIL")?,
            from_name: env_parsed("SMTP_FROM_NAME", defaults.from_name)?,
            connection_timeout_secs: env_parsed("SMTP_CONNECTION_TIMEOUT", defaults.connection_timeout_secs)?,
            notify_to,
        };
        debug!(
            host = %config.smtp_host,
            port = config.smtp_port,
            security = ?config.security(),
            from = %config.from_email,
            "SMTP settings resolved"
        );

        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: "test".to_string(),
            smtp_password: "test".to_string(),
            use_tls: false,
            use_starttls: false,
            from_email: "test@example.com".to_string(),
            from_name: "Homly Test".to_string(),
            connection_timeout_secs: 10,
            notify_to: Some("owner@example.com".to_string()),
        }
    }

    pub fn security(&self) -> SmtpSecurity {
        match (self.use_tls, self.use_starttls) {
            (false, _) => SmtpSecurity::Plain,
            (true, true) => SmtpSecurity::StartTls,
            (true, false) => SmtpSecurity::Wrapper,
        }
    }

    /// `host:port`, for logs
    pub fn get_smtp_url(&self) -> String {
        format!("{}:{}", self.smtp_host, self.smtp_port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

        if self.smtp_host.trim().is_empty() || self.smtp_port == 0 {
            return invalid("SMTP host and port must be set");
        }
        if self.smtp_username.is_empty() || self.smtp_password.is_empty() {
            return invalid("SMTP username and password must be set");
        }
        if !looks_like_address(&self.from_email) {
            return invalid("Invalid from email format");
        }
        if self.notify_to.as_deref().is_some_and(|to| !looks_like_address(to)) {
            return invalid("Invalid ADMIN_EMAIL format");
        }
        if self.connection_timeout_secs == 0 {
            return invalid("Connection timeout cannot be 0");
        }
        Ok(())
    }
}

fn looks_like_address(value: &str) -> bool {
    value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'))
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            smtp_host: "smtp-relay.brevo.com".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            use_tls: true,
            use_starttls: true,
            from_email: "noreply@homly.in".to_string(),
            from_name: "Homly".to_string(),
            connection_timeout_secs: 30,
            notify_to: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_brevo_starttls() {
        let config = EmailConfig::default();
        assert_eq!(config.get_smtp_url(), "smtp-relay.brevo.com:587");
        assert_eq!(config.security(), SmtpSecurity::StartTls);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_security_modes() {
        let mut config = EmailConfig::from_test_env();
        assert_eq!(config.security(), SmtpSecurity::Plain);
        config.use_tls = true;
        assert_eq!(config.security(), SmtpSecurity::Wrapper);
    }

    #[test]
    fn test_addresses() {
        let mut config = EmailConfig::from_test_env();
        assert!(config.validate().is_ok());
        config.notify_to = Some("owner".to_string());
        assert!(config.validate().is_err());
        config.notify_to = None;
        config.from_email = "noreply@localhost".to_string();
        assert!(config.validate().is_err());
    }
}
