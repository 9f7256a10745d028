use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

use crate::config::{is_placeholder, ConfigError};

/// Cloudinary account used for signed client-side uploads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl CloudinaryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading Cloudinary configuration from environment variables");

        let read = |name: &str| {
            env::var(name).ok().filter(|v| !is_placeholder(v)).ok_or_else(|| {
                error!("{} environment variable not found", name);
                ConfigError::EnvVarNotFound(name.to_string())
            })
        };

        let cloud_name = read("CLOUDINARY_CLOUD_NAME")?;
        debug!("Cloudinary cloud name: {}", cloud_name);
        let api_key = read("CLOUDINARY_API_KEY")?;
        let api_secret = read("CLOUDINARY_API_SECRET")?;
        let folder = env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "homly_products".to_string());
        debug!("Cloudinary upload folder: {}", folder);

        let config = CloudinaryConfig { cloud_name, api_key, api_secret, folder };
        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234567890".to_string(),
            api_secret: "test-secret".to_string(),
            folder: "homly_products".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folder.is_empty() || self.folder.contains('&') || self.folder.contains('=') {
            return Err(ConfigError::ValidationError("CLOUDINARY_FOLDER must be a plain folder name".to_string()));
        }
        Ok(())
    }
}
