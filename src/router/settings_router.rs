use std::sync::Arc;

use axum::{routing::get, routing::put, Router};

use crate::handler::settings_handler::{get_setting_handler, list_settings_handler, upsert_setting_handler};
use crate::middlewares::auth::AuthState;
use crate::router::admin;
use crate::service::settings_service::SettingsService;

pub fn settings_router(service: Arc<dyn SettingsService>, auth: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/api/settings", get(list_settings_handler))
        .route("/api/settings/{key}", get(get_setting_handler));

    let manage = admin(Router::new().route("/api/settings/{key}", put(upsert_setting_handler)), &auth);

    public.merge(manage).with_state(service)
}
