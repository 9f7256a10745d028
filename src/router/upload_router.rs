use std::sync::Arc;

use axum::{routing::get, Router};

use crate::config::CloudinaryConfig;
use crate::handler::upload_handler::upload_signature_handler;
use crate::middlewares::auth::AuthState;
use crate::router::protected;

pub fn upload_router(config: Option<Arc<CloudinaryConfig>>, auth: Arc<AuthState>) -> Router {
    protected(Router::new().route("/api/upload/signature", get(upload_signature_handler)), &auth).with_state(config)
}
