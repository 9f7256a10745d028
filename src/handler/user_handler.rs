use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

use crate::dto::api_response::{api_json, ApiResponse, MessageResponse};
use crate::dto::user_dto::{
    AdminUpdateUserRequest, AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, SavedProductRequest, UpdateProfileRequest,
};
use crate::handler::{parse_path_id, validated};
use crate::middlewares::auth::{CurrentUser, AUTH_COOKIE};
use crate::model::user::UserProfile;
use crate::service::user_service::{AuthSession, UserService};
use crate::util::error::HandlerError;

/// How the `jwt` cookie is issued
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    /// Production cookies are `Secure` and `SameSite=None` for the cross-site SPA
    pub secure: bool,
    pub max_age_seconds: i64,
}

impl SessionCookie {
    pub fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build((AUTH_COOKIE, token))
            .http_only(true)
            .path("/")
            .secure(self.secure)
            .same_site(if self.secure { SameSite::None } else { SameSite::Lax })
            .max_age(time::Duration::seconds(self.max_age_seconds))
            .build()
    }

    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((AUTH_COOKIE, "")).path("/").build()
    }
}

#[derive(Clone)]
pub struct UserState {
    pub service: Arc<dyn UserService>,
    pub cookie: SessionCookie,
}

fn signed_in(state: &UserState, jar: CookieJar, status: StatusCode, session: AuthSession) -> (CookieJar, Response) {
    let body = AuthResponse { success: true, data: session.profile(), token: session.token.clone() };
    let jar = jar.add(state.cookie.issue(session.token));
    (jar, api_json(status, &body))
}

pub async fn register_handler(
    State(state): State<UserState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = validated(payload)?;
    let session = state.service.register(payload).await?;
    Ok(signed_in(&state, jar, StatusCode::CREATED, session))
}

pub async fn login_handler(
    State(state): State<UserState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = validated(payload)?;
    let session = state.service.login(&payload.email, &payload.password).await?;
    Ok(signed_in(&state, jar, StatusCode::OK, session))
}

pub async fn logout_handler(State(state): State<UserState>, jar: CookieJar) -> impl IntoResponse {
    (jar.remove(state.cookie.clear()), MessageResponse::new("Logged out successfully"))
}

pub async fn forgot_password_handler(
    State(state): State<UserState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<MessageResponse, HandlerError> {
    let payload = validated(payload)?;
    state.service.forgot_password(&payload.email).await?;
    Ok(MessageResponse::new("If an account exists, a reset link has been sent"))
}

pub async fn reset_password_handler(
    State(state): State<UserState>,
    Path(token): Path<String>,
    jar: CookieJar,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = validated(payload)?;
    let session = state.service.reset_password(&token, &payload.password).await?;
    info!("Password reset completed");
    Ok(signed_in(&state, jar, StatusCode::OK, session))
}

pub async fn get_profile_handler(CurrentUser(user): CurrentUser) -> ApiResponse<UserProfile> {
    ApiResponse::ok(UserProfile::from(&user))
}

pub async fn update_profile_handler(
    State(state): State<UserState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = validated(payload)?;
    let session = state.service.update_profile(user, payload).await?;
    Ok(signed_in(&state, jar, StatusCode::OK, session))
}

pub async fn get_saved_products_handler(
    State(state): State<UserState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, HandlerError> {
    let products = state.service.saved_products(&user).await?;
    Ok(ApiResponse::list(products))
}

pub async fn toggle_saved_product_handler(
    State(state): State<UserState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<SavedProductRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let products = state.service.toggle_saved_product(user, payload.product_id.as_deref()).await?;
    Ok(ApiResponse::list(products))
}

pub async fn list_users_handler(State(state): State<UserState>) -> Result<impl IntoResponse, HandlerError> {
    let users = state.service.list_users().await?;
    Ok(ApiResponse::list(users))
}

pub async fn admin_update_user_handler(
    State(state): State<UserState>,
    Path(id): Path<String>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id, "User")?;
    let payload = validated(payload)?;
    let user = state.service.admin_update_user(&id, payload).await?;
    Ok(ApiResponse::ok(user))
}

pub async fn delete_user_handler(
    State(state): State<UserState>,
    Path(id): Path<String>,
) -> Result<MessageResponse, HandlerError> {
    let id = parse_path_id(&id, "User")?;
    state.service.delete_user(&id).await?;
    Ok(MessageResponse::new("User removed"))
}
