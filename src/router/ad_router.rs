use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::ad_handler::{
    ad_image_handler, create_ad_handler, delete_ad_handler, get_ad_handler, list_ads_handler, update_ad_handler,
};
use crate::middlewares::auth::AuthState;
use crate::router::admin;
use crate::service::ad_service::AdService;

pub fn ad_router(service: Arc<dyn AdService>, auth: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/api/ads", get(list_ads_handler))
        .route("/api/ads/{id}", get(get_ad_handler))
        .route("/api/ads/{id}/image", get(ad_image_handler));

    let manage = admin(
        Router::new()
            .route("/api/ads", post(create_ad_handler))
            .route("/api/ads/{id}", put(update_ad_handler).delete(delete_ad_handler)),
        &auth,
    );

    public.merge(manage).with_state(service)
}
