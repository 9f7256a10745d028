//! Session tokens. One HS256 access token per login, carried in the `jwt`
//! cookie or an `Authorization: Bearer` header. There is no refresh token;
//! profile edits and password resets simply issue a new one.

use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::model::user::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id as 24-hex
    pub sub: String,
    pub email: String,
    /// `customer`, `admin` or `store_admin` at issue time; the middleware
    /// always reloads the user, so this is informational
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<ObjectId, JwtError> {
        ObjectId::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidToken,
}

pub trait JwtTokenUtils {
    /// Signs a token for a persisted user
    fn issue(&self, user: &User) -> Result<String, JwtError>;
    fn validate_token(&self, token: &str) -> Result<Claims, JwtError>;
}

/// The token part of an `Authorization: Bearer <token>` header
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
}

impl JwtTokenUtilsImpl {
    pub fn new(jwt_config: JwtConfig) -> Self {
        JwtTokenUtilsImpl { jwt_config }
    }
}

impl JwtTokenUtils for JwtTokenUtilsImpl {
    fn issue(&self, user: &User) -> Result<String, JwtError> {
        let id = user.id.ok_or(JwtError::InvalidToken)?;
        let now = Utc::now();
        let claims = Claims {
            sub: id.to_hex(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.jwt_config.expiration_minutes)).timestamp(),
            iss: self.jwt_config.jwt_issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let key = EncodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key).map_err(|e| {
            error!("Failed to sign token for {}: {}", claims.sub, e);
            JwtError::EncodingFailed(e.to_string())
        })
    }

    fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if let Some(ref issuer) = self.jwt_config.jwt_issuer {
            validation.set_issuer(&[issuer]);
        }

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => {
                    debug!("Token rejected: {}", e);
                    JwtError::DecodingFailed(e.to_string())
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::Role;

    fn utils() -> JwtTokenUtilsImpl {
        JwtTokenUtilsImpl::new(JwtConfig::from_test_env())
    }

    fn admin() -> User {
        let mut user = User::new("Admin".into(), "admin@homly.in".into(), "hash".into(), Role::Admin);
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_issue_and_validate() {
        let user = admin();
        let claims = utils().validate_token(&utils().issue(&user).unwrap()).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id.unwrap());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 10080 * 60);
        assert_eq!(claims.iss.as_deref(), Some("homly-backend"));
    }

    #[test]
    fn test_unsaved_user_gets_no_token() {
        let mut user = admin();
        user.id = None;
        assert!(matches!(utils().issue(&user), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let mut config = JwtConfig::from_test_env();
        config.expiration_minutes = -5;
        let expired = JwtTokenUtilsImpl::new(config).issue(&admin()).unwrap();
        assert!(matches!(utils().validate_token(&expired), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let mut config = JwtConfig::from_test_env();
        config.jwt_secret = "another_secret_that_is_long_enough_to_pass_validation".to_string();
        let foreign = JwtTokenUtilsImpl::new(config).issue(&admin()).unwrap();
        assert!(matches!(utils().validate_token(&foreign), Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
