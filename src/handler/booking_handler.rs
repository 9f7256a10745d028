use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};

use crate::dto::api_response::{ApiResponse, MessageResponse};
use crate::dto::booking_dto::{CreateServiceRequestRequest, ServiceListingInput, UpdateServiceRequestStatusRequest};
use crate::handler::{parse_path_id, validated};
use crate::middlewares::auth::CurrentUser;
use crate::service::booking_service::BookingService;
use crate::util::error::HandlerError;

pub async fn list_services_handler(
    State(service): State<Arc<dyn BookingService>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::list(service.list_services().await?))
}

pub async fn create_service_handler(
    State(service): State<Arc<dyn BookingService>>,
    Json(payload): Json<ServiceListingInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let listing = service.create_service(validated(payload)?).await?;
    Ok(ApiResponse::created(listing))
}

pub async fn update_service_handler(
    State(service): State<Arc<dyn BookingService>>,
    Path(id): Path<String>,
    Json(payload): Json<ServiceListingInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Service")?;
    let listing = service.update_service(&id, validated(payload)?).await?;
    Ok(ApiResponse::ok(listing))
}

pub async fn delete_service_handler(
    State(service): State<Arc<dyn BookingService>>,
    Path(id): Path<String>,
) -> Result<MessageResponse, HandlerError> {
    let id = parse_path_id(&id, "Service")?;
    service.delete_service(&id).await?;
    Ok(MessageResponse::new("Service removed"))
}

pub async fn create_request_handler(
    State(service): State<Arc<dyn BookingService>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateServiceRequestRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let request = service.create_request(&user, payload.service_id.as_deref()).await?;
    Ok(ApiResponse::created(request))
}

pub async fn list_requests_handler(
    State(service): State<Arc<dyn BookingService>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(ApiResponse::list(service.list_requests().await?))
}

pub async fn update_request_handler(
    State(service): State<Arc<dyn BookingService>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateServiceRequestStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "Service Request")?;
    let request = service.update_request_status(&id, payload.status).await?;
    Ok(ApiResponse::ok(request))
}

pub async fn delete_request_handler(
    State(service): State<Arc<dyn BookingService>>,
    Path(id): Path<String>,
) -> Result<MessageResponse, HandlerError> {
    let id = parse_path_id(&id, "Service Request")?;
    service.delete_request(&id).await?;
    Ok(MessageResponse::new("Service Request removed"))
}
