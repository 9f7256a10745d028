use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::model::user::User;
use crate::repository::user_repo::UserRepository;
use crate::util::error::HandlerError;
use crate::util::jwt::{bearer_token, JwtTokenUtils, JwtTokenUtilsImpl};

pub const AUTH_COOKIE: &str = "jwt";

/// What the auth middlewares need to turn a token into a user
pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl AuthState {
    pub fn new(jwt_utils: Arc<JwtTokenUtilsImpl>, user_repo: Arc<dyn UserRepository>) -> Self {
        AuthState { jwt_utils, user_repo }
    }
}

#[derive(Debug)]
enum AuthFailure {
    NoToken,
    TokenFailed,
    UserNotFound,
}

impl From<AuthFailure> for HandlerError {
    fn from(failure: AuthFailure) -> Self {
        let message = match failure {
            AuthFailure::NoToken => "Not authorized, no token",
            AuthFailure::TokenFailed => "Not authorized, token failed",
            AuthFailure::UserNotFound => "Not authorized, user not found",
        };
        HandlerError::unauthorized(message)
    }
}

/// Cookie first, then `Authorization: Bearer`
fn request_token(req: &Request<Body>) -> Option<String> {
    let jar = CookieJar::from_headers(req.headers());
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string)
}

async fn authenticate(state: &AuthState, token: Option<String>) -> Result<User, AuthFailure> {
    let token = token.ok_or(AuthFailure::NoToken)?;
    let claims = state.jwt_utils.validate_token(&token).map_err(|e| {
        debug!("Rejected token: {}", e);
        AuthFailure::TokenFailed
    })?;
    let user_id = claims.user_id().map_err(|_| AuthFailure::TokenFailed)?;
    match state.user_repo.find_by_id(&user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AuthFailure::UserNotFound),
        Err(e) => {
            warn!("User lookup failed during auth: {}", e);
            Err(AuthFailure::TokenFailed)
        }
    }
}

/// Requires a valid token whose user still exists; the user is stored in the request extensions
pub async fn protect(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let token = request_token(&req);
    let user = authenticate(&state, token).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Like [`protect`] but lets the request through as a guest on any failure
pub async fn optional_auth(State(state): State<Arc<AuthState>>, mut req: Request<Body>, next: Next) -> Response {
    let token = request_token(&req);
    match authenticate(&state, token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
        }
        Err(failure) => debug!(?failure, "Continuing as guest"),
    }
    next.run(req).await
}

/// Must run after [`protect`]
pub async fn admin_only(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    match req.extensions().get::<User>() {
        Some(user) if user.is_admin() => Ok(next.run(req).await),
        Some(user) => {
            warn!("Non-admin {} denied", user.email);
            Err(HandlerError::forbidden("Not authorized as admin"))
        }
        None => Err(AuthFailure::NoToken.into()),
    }
}

/// The authenticated user; only valid behind [`protect`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AuthFailure::NoToken.into())
    }
}

/// The caller when [`optional_auth`] recognised them
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(User::is_admin)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<User>().cloned()))
    }
}
