use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handler::cart_handler::validate_cart_handler;
use crate::service::cart_service::CartService;

pub fn cart_router(service: Arc<dyn CartService>) -> Router {
    Router::new()
        .route("/api/cart/validate", post(validate_cart_handler))
        .with_state(service)
}
