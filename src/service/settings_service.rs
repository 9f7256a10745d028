use std::sync::Arc;

use async_trait::async_trait;
use bson::Bson;
use serde_json::Value;
use tracing::{info, instrument};

use crate::model::setting::{Setting, DELIVERY_TIMES_KEY, MAINTENANCE_MODE_KEY};
use crate::repository::settings_repo::SettingsRepository;
use crate::util::error::{ServiceError, ServiceResult};

#[async_trait]
pub trait SettingsService: Send + Sync {
    async fn list_settings(&self) -> ServiceResult<Vec<Setting>>;
    /// `delivery_times` reads as an empty list until an admin sets it
    async fn get_setting(&self, key: &str) -> ServiceResult<Setting>;
    async fn upsert_setting(&self, key: &str, value: Option<Value>, description: Option<String>) -> ServiceResult<Setting>;
    async fn maintenance_mode(&self) -> ServiceResult<bool>;
}

pub struct SettingsServiceImpl {
    settings_repo: Arc<dyn SettingsRepository>,
}

impl SettingsServiceImpl {
    pub fn new(settings_repo: Arc<dyn SettingsRepository>) -> Self {
        Self { settings_repo }
    }
}

fn empty_delivery_times() -> Setting {
    Setting {
        id: None,
        key: DELIVERY_TIMES_KEY.to_string(),
        value: Bson::Array(Vec::new()),
        description: None,
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl SettingsService for SettingsServiceImpl {
    async fn list_settings(&self) -> ServiceResult<Vec<Setting>> {
        Ok(self.settings_repo.list().await?)
    }

    async fn get_setting(&self, key: &str) -> ServiceResult<Setting> {
        match self.settings_repo.find_by_key(key).await? {
            Some(setting) => Ok(setting),
            None if key == DELIVERY_TIMES_KEY => Ok(empty_delivery_times()),
            None => Err(ServiceError::NotFound("Setting not found".to_string())),
        }
    }

    #[instrument(skip(self, value, description))]
    async fn upsert_setting(&self, key: &str, value: Option<Value>, description: Option<String>) -> ServiceResult<Setting> {
        let value = value
            .filter(|v| !v.is_null())
            .ok_or_else(|| ServiceError::InvalidInput("Value is required".to_string()))?;
        let value = bson::to_bson(&value).map_err(|e| ServiceError::InvalidInput(format!("Unsupported value: {}", e)))?;
        let saved = self.settings_repo.upsert(key, value, description).await?;
        info!("Setting {} saved", key);
        Ok(saved)
    }

    async fn maintenance_mode(&self) -> ServiceResult<bool> {
        Ok(self
            .settings_repo
            .find_by_key(MAINTENANCE_MODE_KEY)
            .await?
            .is_some_and(|s| s.as_bool()))
    }
}
