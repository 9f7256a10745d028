use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};

use crate::dto::api_response::ApiResponse;
use crate::dto::catalog_dto::{StoreInput, StoreQuery};
use crate::handler::{parse_path_id, validated};
use crate::model::store::Store;
use crate::service::store_service::StoreService;
use crate::util::error::HandlerError;
use crate::util::image::resolve_image;

pub async fn list_stores_handler(
    State(service): State<Arc<dyn StoreService>>,
    Query(query): Query<StoreQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let stores = service.list_stores(query).await?;
    Ok(ApiResponse::list(stores))
}

pub async fn get_store_handler(
    State(service): State<Arc<dyn StoreService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Store")?;
    Ok(ApiResponse::ok(service.get_store(&id).await?))
}

pub async fn store_image_handler(
    State(service): State<Arc<dyn StoreService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Store")?;
    let store: Store = service.get_store(&id).await?;
    Ok(resolve_image(Some(store.image.as_str()))?)
}

pub async fn create_store_handler(
    State(service): State<Arc<dyn StoreService>>,
    Json(payload): Json<StoreInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let store = service.create_store(validated(payload)?).await?;
    Ok(ApiResponse::created(store))
}

pub async fn update_store_handler(
    State(service): State<Arc<dyn StoreService>>,
    Path(id): Path<String>,
    Json(payload): Json<StoreInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Store")?;
    let store = service.update_store(&id, validated(payload)?).await?;
    Ok(ApiResponse::ok(store))
}

pub async fn delete_store_handler(
    State(service): State<Arc<dyn StoreService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Store")?;
    service.delete_store(&id).await?;
    Ok(ApiResponse::empty())
}
