use std::sync::Arc;

use axum::{middleware, Router};

use crate::middlewares::auth::{admin_only, optional_auth, protect, AuthState};

pub mod ad_router;
pub mod booking_router;
pub mod cart_router;
pub mod category_router;
pub mod event_router;
pub mod news_router;
pub mod order_router;
pub mod product_router;
pub mod settings_router;
pub mod store_router;
pub mod upload_router;
pub mod user_router;

/// Requests proceed as guests unless a valid token identifies the caller
pub(crate) fn with_optional_auth<S: Clone + Send + Sync + 'static>(router: Router<S>, auth: &Arc<AuthState>) -> Router<S> {
    router.route_layer(middleware::from_fn_with_state(auth.clone(), optional_auth))
}

pub(crate) fn protected<S: Clone + Send + Sync + 'static>(router: Router<S>, auth: &Arc<AuthState>) -> Router<S> {
    router.route_layer(middleware::from_fn_with_state(auth.clone(), protect))
}

/// `protect` runs first, then `admin_only`
pub(crate) fn admin<S: Clone + Send + Sync + 'static>(router: Router<S>, auth: &Arc<AuthState>) -> Router<S> {
    router
        .route_layer(middleware::from_fn(admin_only))
        .route_layer(middleware::from_fn_with_state(auth.clone(), protect))
}
