use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tracing::{error, info, instrument, warn};

use crate::config::PasswordResetConfig;
use crate::dto::user_dto::{AdminUpdateUserRequest, RegisterRequest, UpdateProfileRequest};
use crate::model::product::Product;
use crate::model::user::{Role, User, UserProfile};
use crate::repository::product_repo::ProductRepository;
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepository;
use crate::service::notification_service::Notifier;
use crate::util::error::{ServiceError, ServiceResult};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};
use crate::util::password_reset::{hash_reset_token, ResetToken};

/// A signed-in user and the token that proves it
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

impl AuthSession {
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(&self.user)
    }
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthSession>;
    async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthSession>;
    async fn update_profile(&self, user: User, request: UpdateProfileRequest) -> ServiceResult<AuthSession>;
    async fn saved_products(&self, user: &User) -> ServiceResult<Vec<Product>>;
    async fn toggle_saved_product(&self, user: User, product_id: Option<&str>) -> ServiceResult<Vec<Product>>;
    async fn list_users(&self) -> ServiceResult<Vec<UserProfile>>;
    async fn admin_update_user(&self, id: &ObjectId, request: AdminUpdateUserRequest) -> ServiceResult<UserProfile>;
    async fn delete_user(&self, id: &ObjectId) -> ServiceResult<()>;
    /// Emails a reset link when the address belongs to an account; unknown addresses succeed silently
    async fn forgot_password(&self, email: &str) -> ServiceResult<()>;
    async fn reset_password(&self, raw_token: &str, password: &str) -> ServiceResult<AuthSession>;
}

pub struct UserServiceImpl {
    user_repo: Arc<dyn UserRepository>,
    product_repo: Arc<dyn ProductRepository>,
    notifier: Arc<dyn Notifier>,
    jwt_utils: Arc<JwtTokenUtilsImpl>,
    reset_config: PasswordResetConfig,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        product_repo: Arc<dyn ProductRepository>,
        notifier: Arc<dyn Notifier>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
        reset_config: PasswordResetConfig,
    ) -> Self {
        Self { user_repo, product_repo, notifier, jwt_utils, reset_config }
    }

    fn session(&self, user: User) -> ServiceResult<AuthSession> {
        let token = self
            .jwt_utils
            .issue(&user)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        Ok(AuthSession { token, user })
    }

    fn hash(password: &str) -> ServiceResult<String> {
        PasswordUtilsImpl::hash_password(password).map_err(|e| ServiceError::InternalError(e.to_string()))
    }

    /// Rejects an email change that would collide with another account
    async fn ensure_email_free(&self, email: &str, owner: Option<ObjectId>) -> ServiceResult<()> {
        if let Some(existing) = self.user_repo.find_by_email(email).await? {
            if existing.id != owner {
                return Err(ServiceError::InvalidInput("Email already in use".to_string()));
            }
        }
        Ok(())
    }

    /// Saved products in the order they were saved; ids whose product is gone are skipped
    async fn populate_saved(&self, ids: &[ObjectId]) -> ServiceResult<Vec<Product>> {
        let mut by_id: HashMap<ObjectId, Product> = self
            .product_repo
            .find_by_ids(ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(|mut p| {
                p.image.clear();
                p
            })
            .collect())
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthSession> {
        info!("Registering new user");
        if self.user_repo.find_by_email(&request.email).await?.is_some() {
            warn!("Registration rejected, email taken");
            return Err(ServiceError::InvalidInput("User already exists".to_string()));
        }

        let hash = Self::hash(&request.password)?;
        let user = User::new(request.name.trim().to_string(), request.email, hash, Role::Customer);
        let inserted = match self.user_repo.insert(user).await {
            Ok(user) => user,
            Err(RepositoryError::AlreadyExists(_)) => {
                return Err(ServiceError::InvalidInput("User already exists".to_string()));
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                return Err(e.into());
            }
        };
        info!("User registered");
        self.session(inserted)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthSession> {
        let invalid = || ServiceError::Unauthorized("Invalid email or password".to_string());
        let user = self.user_repo.find_by_email(email).await?.ok_or_else(invalid)?;
        let valid = PasswordUtilsImpl::verify_password(password, &user.password_hash).unwrap_or_else(|e| {
            error!("Stored password hash unusable: {}", e);
            false
        });
        if !valid {
            warn!("Failed login attempt");
            return Err(invalid());
        }
        info!("User logged in");
        self.session(user)
    }

    #[instrument(skip(self, user, request))]
    async fn update_profile(&self, mut user: User, request: UpdateProfileRequest) -> ServiceResult<AuthSession> {
        let id = user.id.ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                self.ensure_email_free(&email, Some(id)).await?;
                user.email = email;
            }
        }
        if let Some(mobile) = request.mobile {
            user.mobile = Some(mobile);
        }
        if let Some(address) = request.address {
            user.address = Some(address);
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            user.password_hash = Self::hash(&password)?;
        }

        let updated = self.user_repo.update(id, user).await?;
        info!("Profile updated for user {}", id);
        self.session(updated)
    }

    async fn saved_products(&self, user: &User) -> ServiceResult<Vec<Product>> {
        self.populate_saved(&user.saved_products).await
    }

    #[instrument(skip(self, user))]
    async fn toggle_saved_product(&self, mut user: User, product_id: Option<&str>) -> ServiceResult<Vec<Product>> {
        let product_id = product_id
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Product ID is required".to_string()))?;
        let product_id = ObjectId::parse_str(product_id)
            .map_err(|_| ServiceError::InvalidInput("Invalid product ID".to_string()))?;
        let user_id = user.id.ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let saved = user.toggle_saved_product(product_id);
        self.user_repo.set_saved_products(&user_id, &user.saved_products).await?;
        info!(saved, "Toggled saved product {}", product_id);
        self.populate_saved(&user.saved_products).await
    }

    async fn list_users(&self) -> ServiceResult<Vec<UserProfile>> {
        let users = self.user_repo.list().await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }

    #[instrument(skip(self, request))]
    async fn admin_update_user(&self, id: &ObjectId, request: AdminUpdateUserRequest) -> ServiceResult<UserProfile> {
        let mut user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                self.ensure_email_free(&email, Some(*id)).await?;
                user.email = email;
            }
        }
        if let Some(mobile) = request.mobile {
            user.mobile = Some(mobile);
        }
        if let Some(address) = request.address {
            user.address = Some(address);
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        match request.store_id.as_deref().map(str::trim) {
            Some("") => user.store_id = None,
            Some(raw) => {
                let store_id = ObjectId::parse_str(raw)
                    .map_err(|_| ServiceError::InvalidInput("Invalid store ID".to_string()))?;
                user.store_id = Some(store_id);
            }
            None if user.role != Role::StoreAdmin => user.store_id = None,
            None => {}
        }
        if let Some(coins) = request.coins {
            if coins < 0 {
                return Err(ServiceError::InvalidInput("Coins cannot be negative".to_string()));
            }
            user.coins = coins;
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            user.password_hash = Self::hash(&password)?;
        }

        let updated = self.user_repo.update(*id, user).await?;
        info!("Admin updated user {}", id);
        Ok(UserProfile::from(&updated))
    }

    async fn delete_user(&self, id: &ObjectId) -> ServiceResult<()> {
        if self.user_repo.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        self.user_repo.delete(id).await?;
        info!("User {} removed", id);
        Ok(())
    }

    #[instrument(skip(self, email))]
    async fn forgot_password(&self, email: &str) -> ServiceResult<()> {
        let Some(mut user) = self.user_repo.find_by_email(email).await? else {
            info!("Password reset requested for unknown address");
            return Ok(());
        };
        let id = user.id.ok_or_else(|| ServiceError::InternalError("Stored user has no id".to_string()))?;

        let token = ResetToken::issue(&self.reset_config, Utc::now().timestamp());
        user.reset_password_token = Some(token.hash.clone());
        user.reset_password_expire = Some(token.expires_at);
        let mut user = self.user_repo.update(id, user).await?;

        let reset_url = self.reset_config.reset_url(&token.raw);
        if let Err(e) = self.notifier.send_password_reset(&user.email, &reset_url).await {
            error!("Password reset email failed: {}", e);
            user.reset_password_token = None;
            user.reset_password_expire = None;
            if let Err(e) = self.user_repo.update(id, user).await {
                error!("Failed to clear reset token after email failure: {}", e);
            }
            return Err(ServiceError::DeliveryFailed("Email could not be sent".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, raw_token, password))]
    async fn reset_password(&self, raw_token: &str, password: &str) -> ServiceResult<AuthSession> {
        let hashed = hash_reset_token(raw_token);
        let mut user = self
            .user_repo
            .find_by_reset_token(&hashed, Utc::now().timestamp())
            .await?
            .ok_or_else(|| ServiceError::InvalidInput("Invalid token".to_string()))?;
        let id = user.id.ok_or_else(|| ServiceError::InvalidInput("Invalid token".to_string()))?;

        user.password_hash = Self::hash(password)?;
        user.reset_password_token = None;
        user.reset_password_expire = None;
        let updated = self.user_repo.update(id, user).await?;
        info!("Password reset for user {}", id);
        self.session(updated)
    }
}
