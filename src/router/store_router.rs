use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::store_handler::{
    create_store_handler, delete_store_handler, get_store_handler, list_stores_handler, store_image_handler,
    update_store_handler,
};
use crate::middlewares::auth::AuthState;
use crate::router::admin;
use crate::service::store_service::StoreService;

pub fn store_router(service: Arc<dyn StoreService>, auth: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/api/stores", get(list_stores_handler))
        .route("/api/stores/{id}", get(get_store_handler))
        .route("/api/stores/{id}/image", get(store_image_handler));

    let manage = admin(
        Router::new()
            .route("/api/stores", post(create_store_handler))
            .route("/api/stores/{id}", put(update_store_handler).delete(delete_store_handler)),
        &auth,
    );

    public.merge(manage).with_state(service)
}
