use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use chrono::Utc;
use tracing::{debug, warn};

use crate::config::CloudinaryConfig;
use crate::dto::api_response::api_json;
use crate::util::cloudinary::sign_upload;
use crate::util::error::{HandlerError, HandlerErrorKind};

/// Signs a client-direct Cloudinary upload. Without credentials the route answers 503.
pub async fn upload_signature_handler(
    State(config): State<Option<Arc<CloudinaryConfig>>>,
) -> Result<Response, HandlerError> {
    let Some(config) = config else {
        warn!("Upload signature requested but Cloudinary is not configured");
        return Err(HandlerError::new(HandlerErrorKind::Unavailable, "Image uploads are not configured"));
    };
    let signed = sign_upload(&config, Utc::now().timestamp());
    debug!("Issued upload signature for folder {}", signed.folder);
    Ok(api_json(StatusCode::OK, &signed))
}
