use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handler::order_handler::{
    create_order_handler, delete_order_handler, get_order_handler, list_orders_handler, update_order_handler,
};
use crate::middlewares::auth::AuthState;
use crate::router::{protected, with_optional_auth};
use crate::service::order_service::OrderService;

pub fn order_router(service: Arc<dyn OrderService>, auth: Arc<AuthState>) -> Router {
    // Guests may check out
    let checkout = with_optional_auth(Router::new().route("/api/orders", post(create_order_handler)), &auth);

    let account = protected(
        Router::new()
            .route("/api/orders", get(list_orders_handler))
            .route(
                "/api/orders/{id}",
                get(get_order_handler).put(update_order_handler).delete(delete_order_handler),
            ),
        &auth,
    );

    checkout.merge(account).with_state(service)
}
