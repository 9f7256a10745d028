//! Response envelopes.
//!
//! Bodies are serialized through [`api_json`], which renders BSON object ids
//! (`{"$oid": "…"}` under plain serde) as their 24-hex string.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::util::error::{HandlerError, HandlerErrorKind};

/// `{success, count?, data}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse { success: true, count: None, data, status: StatusCode::OK }
    }

    pub fn created(data: T) -> Self {
        ApiResponse { success: true, count: None, data, status: StatusCode::CREATED }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        ApiResponse { success: true, count: Some(items.len()), data: items, status: StatusCode::OK }
    }
}

impl ApiResponse<Value> {
    /// `{success: true, data: {}}` returned by deletes
    pub fn empty() -> Self {
        ApiResponse::ok(Value::Object(Default::default()))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        api_json(self.status, &self)
    }
}

/// `{success, message}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { success: true, message: message.into() }
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        api_json(StatusCode::OK, &self)
    }
}

/// One page of a paginated listing
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub data: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        PageResponse { success: true, count: data.len(), total, page, pages, data }
    }
}

impl<T: Serialize> IntoResponse for PageResponse<T> {
    fn into_response(self) -> Response {
        api_json(StatusCode::OK, &self)
    }
}

/// Serializes `body` with object ids flattened to strings
pub fn api_json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_value(body) {
        Ok(value) => (status, Json(plain_ids(value))).into_response(),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            HandlerError::new(HandlerErrorKind::Internal, "Server Error").into_response()
        }
    }
}

/// Replaces every `{"$oid": "<hex>"}` object with the bare hex string
pub fn plain_ids(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(hex)) = map.get("$oid") {
                    return Value::String(hex.clone());
                }
            }
            Value::Object(map.into_iter().map(|(k, v)| (k, plain_ids(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(plain_ids).collect()),
        other => other,
    }
}
