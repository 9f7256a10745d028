use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};

use crate::dto::api_response::ApiResponse;
use crate::dto::catalog_dto::CategoryInput;
use crate::handler::{parse_path_id, validated};
use crate::service::category_service::CategoryService;
use crate::util::error::HandlerError;
use crate::util::image::resolve_image;

pub async fn list_categories_handler(
    State(service): State<Arc<dyn CategoryService>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::list(service.list_categories().await?))
}

pub async fn get_category_handler(
    State(service): State<Arc<dyn CategoryService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Category")?;
    Ok(ApiResponse::ok(service.get_category(&id).await?))
}

pub async fn category_image_handler(
    State(service): State<Arc<dyn CategoryService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Category")?;
    let category = service.get_category(&id).await?;
    Ok(resolve_image(Some(category.image.as_str()))?)
}

pub async fn create_category_handler(
    State(service): State<Arc<dyn CategoryService>>,
    Json(payload): Json<CategoryInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let category = service.create_category(validated(payload)?).await?;
    Ok(ApiResponse::created(category))
}

pub async fn update_category_handler(
    State(service): State<Arc<dyn CategoryService>>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Category")?;
    let category = service.update_category(&id, validated(payload)?).await?;
    Ok(ApiResponse::ok(category))
}

pub async fn delete_category_handler(
    State(service): State<Arc<dyn CategoryService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Category")?;
    service.delete_category(&id).await?;
    Ok(ApiResponse::empty())
}
