use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};

use crate::dto::api_response::ApiResponse;
use crate::dto::catalog_dto::AdInput;
use crate::handler::{parse_path_id, validated};
use crate::service::ad_service::AdService;
use crate::util::error::HandlerError;
use crate::util::image::resolve_image;

pub async fn list_ads_handler(State(service): State<Arc<dyn AdService>>) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::list(service.list_ads().await?))
}

pub async fn get_ad_handler(
    State(service): State<Arc<dyn AdService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Ad")?;
    Ok(ApiResponse::ok(service.get_ad(&id).await?))
}

pub async fn ad_image_handler(
    State(service): State<Arc<dyn AdService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Ad")?;
    let ad = service.get_ad(&id).await?;
    Ok(resolve_image(Some(ad.image.as_str()))?)
}

pub async fn create_ad_handler(
    State(service): State<Arc<dyn AdService>>,
    Json(payload): Json<AdInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let ad = service.create_ad(validated(payload)?).await?;
    Ok(ApiResponse::created(ad))
}

pub async fn update_ad_handler(
    State(service): State<Arc<dyn AdService>>,
    Path(id): Path<String>,
    Json(payload): Json<AdInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Ad")?;
    let ad = service.update_ad(&id, validated(payload)?).await?;
    Ok(ApiResponse::ok(ad))
}

pub async fn delete_ad_handler(
    State(service): State<Arc<dyn AdService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Ad")?;
    service.delete_ad(&id).await?;
    Ok(ApiResponse::empty())
}
