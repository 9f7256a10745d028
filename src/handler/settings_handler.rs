use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};

use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::UpsertSettingRequest;
use crate::service::settings_service::SettingsService;
use crate::util::error::HandlerError;

pub async fn list_settings_handler(
    State(service): State<Arc<dyn SettingsService>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::list(service.list_settings().await?))
}

pub async fn get_setting_handler(
    State(service): State<Arc<dyn SettingsService>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::ok(service.get_setting(&key).await?))
}

pub async fn upsert_setting_handler(
    State(service): State<Arc<dyn SettingsService>>,
    Path(key): Path<String>,
    Json(payload): Json<UpsertSettingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let setting = service.upsert_setting(&key, payload.value, payload.description).await?;
    Ok(ApiResponse::ok(setting))
}
