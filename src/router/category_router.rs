use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::category_handler::{
    category_image_handler, create_category_handler, delete_category_handler, get_category_handler,
    list_categories_handler, update_category_handler,
};
use crate::middlewares::auth::AuthState;
use crate::router::admin;
use crate::service::category_service::CategoryService;

pub fn category_router(service: Arc<dyn CategoryService>, auth: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/api/categories", get(list_categories_handler))
        .route("/api/categories/{id}", get(get_category_handler))
        .route("/api/categories/{id}/image", get(category_image_handler));

    let manage = admin(
        Router::new()
            .route("/api/categories", post(create_category_handler))
            .route("/api/categories/{id}", put(update_category_handler).delete(delete_category_handler)),
        &auth,
    );

    public.merge(manage).with_state(service)
}
