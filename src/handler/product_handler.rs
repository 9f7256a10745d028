use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};

use crate::dto::api_response::{ApiResponse, PageResponse};
use crate::dto::catalog_dto::{ProductInput, ProductQuery};
use crate::handler::{parse_path_id, validated};
use crate::middlewares::auth::MaybeUser;
use crate::service::product_service::ProductService;
use crate::util::error::HandlerError;
use crate::util::image::resolve_image;

pub async fn list_products_handler(
    State(service): State<Arc<dyn ProductService>>,
    viewer: MaybeUser,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = service.list_products(query, viewer.is_admin()).await?;
    Ok(PageResponse::new(page.products, page.total, page.page, page.limit))
}

pub async fn get_product_handler(
    State(service): State<Arc<dyn ProductService>>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Product")?;
    let product = service.get_product(&id, viewer.is_admin()).await?;
    Ok(ApiResponse::ok(product))
}

pub async fn product_image_handler(
    State(service): State<Arc<dyn ProductService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Product")?;
    let image = service.product_image(&id).await?;
    Ok(resolve_image(image.as_deref())?)
}

pub async fn create_product_handler(
    State(service): State<Arc<dyn ProductService>>,
    Json(payload): Json<ProductInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let product = service.create_product(validated(payload)?).await?;
    Ok(ApiResponse::created(product))
}

pub async fn update_product_handler(
    State(service): State<Arc<dyn ProductService>>,
    Path(id): Path<String>,
    Json(payload): Json<ProductInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Product")?;
    let product = service.update_product(&id, validated(payload)?).await?;
    Ok(ApiResponse::ok(product))
}

pub async fn delete_product_handler(
    State(service): State<Arc<dyn ProductService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Product")?;
    service.delete_product(&id).await?;
    Ok(ApiResponse::empty())
}
