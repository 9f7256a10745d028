use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
};

use crate::dto::api_response::ApiResponse;
use crate::dto::cart_dto::ValidateCartRequest;
use crate::handler::validated;
use crate::service::cart_service::CartService;
use crate::util::error::HandlerError;

pub async fn validate_cart_handler(
    State(service): State<Arc<dyn CartService>>,
    Json(payload): Json<ValidateCartRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let cart = service.validate(validated(payload)?.items).await?;
    Ok(ApiResponse::ok(cart))
}
