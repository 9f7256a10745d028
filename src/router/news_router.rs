use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::news_handler::{
    create_news_handler, delete_news_handler, get_news_handler, list_news_handler, update_news_handler,
};
use crate::middlewares::auth::AuthState;
use crate::router::admin;
use crate::service::news_service::NewsService;

pub fn news_router(service: Arc<dyn NewsService>, auth: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/api/news", get(list_news_handler))
        .route("/api/news/{id}", get(get_news_handler));

    let manage = admin(
        Router::new()
            .route("/api/news", post(create_news_handler))
            .route("/api/news/{id}", put(update_news_handler).delete(delete_news_handler)),
        &auth,
    );

    public.merge(manage).with_state(service)
}
