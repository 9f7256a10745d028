use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};

use crate::dto::api_response::ApiResponse;
use crate::dto::catalog_dto::{NewsInput, NewsQuery};
use crate::handler::{parse_path_id, validated};
use crate::service::news_service::NewsService;
use crate::util::error::HandlerError;

pub async fn list_news_handler(
    State(service): State<Arc<dyn NewsService>>,
    Query(query): Query<NewsQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::list(service.list_news(query).await?))
}

pub async fn get_news_handler(
    State(service): State<Arc<dyn NewsService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "News")?;
    Ok(ApiResponse::ok(service.read_news(&id).await?))
}

pub async fn create_news_handler(
    State(service): State<Arc<dyn NewsService>>,
    Json(payload): Json<NewsInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let news = service.create_news(validated(payload)?).await?;
    Ok(ApiResponse::created(news))
}

pub async fn update_news_handler(
    State(service): State<Arc<dyn NewsService>>,
    Path(id): Path<String>,
    Json(payload): Json<NewsInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "News")?;
    let news = service.update_news(&id, validated(payload)?).await?;
    Ok(ApiResponse::ok(news))
}

pub async fn delete_news_handler(
    State(service): State<Arc<dyn NewsService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "News")?;
    service.delete_news(&id).await?;
    Ok(ApiResponse::empty())
}
