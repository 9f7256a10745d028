use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::user_handler::{
    admin_update_user_handler, delete_user_handler, forgot_password_handler, get_profile_handler,
    get_saved_products_handler, list_users_handler, login_handler, logout_handler, register_handler,
    reset_password_handler, toggle_saved_product_handler, update_profile_handler, UserState,
};
use crate::middlewares::auth::AuthState;
use crate::router::{admin, protected};

pub fn user_router(state: UserState, auth: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/api/users/register", post(register_handler))
        .route("/api/users/login", post(login_handler))
        .route("/api/users/logout", post(logout_handler))
        .route("/api/users/forgotpassword", post(forgot_password_handler))
        .route("/api/users/resetpassword/{token}", put(reset_password_handler));

    let account = protected(
        Router::new()
            .route("/api/users/profile", get(get_profile_handler).put(update_profile_handler))
            .route(
                "/api/users/profile/saved-products",
                get(get_saved_products_handler).post(toggle_saved_product_handler),
            ),
        &auth,
    );

    let management = admin(
        Router::new()
            .route("/api/users", get(list_users_handler))
            .route("/api/users/{id}", put(admin_update_user_handler).delete(delete_user_handler)),
        &auth,
    );

    public.merge(account).merge(management).with_state(state)
}
