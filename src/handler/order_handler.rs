use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};

use crate::dto::api_response::ApiResponse;
use crate::dto::order_dto::{CreateOrderRequest, UpdateOrderStatusRequest};
use crate::handler::{parse_path_id, validated};
use crate::middlewares::auth::{CurrentUser, MaybeUser};
use crate::service::order_service::OrderService;
use crate::util::error::HandlerError;

pub async fn create_order_handler(
    State(service): State<Arc<dyn OrderService>>,
    MaybeUser(buyer): MaybeUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = validated(payload)?;
    let order = service.create_order(buyer, payload).await?;
    Ok(ApiResponse::created(order))
}

pub async fn list_orders_handler(
    State(service): State<Arc<dyn OrderService>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::list(service.list_orders(&user).await?))
}

pub async fn get_order_handler(
    State(service): State<Arc<dyn OrderService>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Order")?;
    Ok(ApiResponse::ok(service.get_order(&user, &id).await?))
}

pub async fn update_order_handler(
    State(service): State<Arc<dyn OrderService>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Order")?;
    let order = service.update_status(&user, &id, payload.status).await?;
    Ok(ApiResponse::ok(order))
}

pub async fn delete_order_handler(
    State(service): State<Arc<dyn OrderService>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Order")?;
    service.delete_order(&user, &id).await?;
    Ok(ApiResponse::empty())
}
