use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::booking_handler::{
    create_request_handler, create_service_handler, delete_request_handler, delete_service_handler,
    list_requests_handler, list_services_handler, update_request_handler, update_service_handler,
};
use crate::middlewares::auth::AuthState;
use crate::router::{admin, protected};
use crate::service::booking_service::BookingService;

/// `/api/services` and `/api/serviceRequests`
pub fn booking_router(service: Arc<dyn BookingService>, auth: Arc<AuthState>) -> Router {
    let public = Router::new().route("/api/services", get(list_services_handler));

    let customer = protected(Router::new().route("/api/serviceRequests", post(create_request_handler)), &auth);

    let manage = admin(
        Router::new()
            .route("/api/services", post(create_service_handler))
            .route("/api/services/{id}", put(update_service_handler).delete(delete_service_handler))
            .route("/api/serviceRequests", get(list_requests_handler))
            .route("/api/serviceRequests/{id}", put(update_request_handler).delete(delete_request_handler)),
        &auth,
    );

    public.merge(customer).merge(manage).with_state(service)
}
