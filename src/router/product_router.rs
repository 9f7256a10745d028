use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::product_handler::{
    create_product_handler, delete_product_handler, get_product_handler, list_products_handler,
    product_image_handler, update_product_handler,
};
use crate::middlewares::auth::AuthState;
use crate::router::{admin, with_optional_auth};
use crate::service::product_service::ProductService;

pub fn product_router(service: Arc<dyn ProductService>, auth: Arc<AuthState>) -> Router {
    let public = Router::new().route("/api/products/{id}/image", get(product_image_handler));

    let browse = with_optional_auth(
        Router::new()
            .route("/api/products", get(list_products_handler))
            .route("/api/products/{id}", get(get_product_handler)),
        &auth,
    );

    let manage = admin(
        Router::new()
            .route("/api/products", post(create_product_handler))
            .route("/api/products/{id}", put(update_product_handler).delete(delete_product_handler)),
        &auth,
    );

    public.merge(browse).merge(manage).with_state(service)
}
