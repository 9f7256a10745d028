//! Password reset tokens.
//!
//! The raw token only ever travels in the emailed link; the user document keeps
//! its SHA-256 digest and an expiry timestamp.

use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::PasswordResetConfig;

/// Freshly issued reset token
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Hex string sent to the user
    pub raw: String,
    /// Digest persisted on the user
    pub hash: String,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
}

impl ResetToken {
    pub fn issue(config: &PasswordResetConfig, now: i64) -> Self {
        let mut bytes = vec![0u8; config.token_bytes];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);
        let hash = hash_reset_token(&raw);
        debug!("Issued reset token valid for {} minutes", config.token_expiration_minutes);
        ResetToken {
            raw,
            hash,
            expires_at: now + config.token_expiration_minutes * 60,
        }
    }
}

/// Hex SHA-256 of the raw token as stored on the user
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_token_shape() {
        let config = PasswordResetConfig::from_test_env();
        let token = ResetToken::issue(&config, 1_000);
        assert_eq!(token.raw.len(), 40);
        assert!(token.raw.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.hash, hash_reset_token(&token.raw));
        assert_eq!(token.expires_at, 1_000 + 600);
    }

    #[test]
    fn test_tokens_are_unique() {
        let config = PasswordResetConfig::from_test_env();
        let a = ResetToken::issue(&config, 0);
        let b = ResetToken::issue(&config, 0);
        assert_ne!(a.raw, b.raw);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
