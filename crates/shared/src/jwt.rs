//! JWT access-token utilities.
//!
//! Tokens are signed with HS256 using a shared secret from configuration.
//! The subject claim carries the user id; the `role` claim carries the global
//! role so handlers can make access decisions without a directory lookup.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodeError(String),

    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: user id.
    pub sub: String,
    /// Global role name (e.g. `ADMIN`).
    pub role: String,
    /// Token id, for session tracking.
    pub jti: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Signing configuration for access tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_secs: i64,
    leeway_secs: u64,
}

impl JwtConfig {
    /// Creates a config from a shared secret.
    pub fn new(secret: &str, access_token_expiry_secs: i64, leeway_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs,
            leeway_secs,
        }
    }

    /// Issues an access token for the given user and role.
    pub fn issue_access_token(&self, user_id: Uuid, role: &str) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.access_token_expiry_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodeError(e.to_string()))
    }

    /// Validates an access token and returns its claims.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are deliberately omitted.
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-secret-at-least-32-bytes-long!!", 3600, 30)
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = config.issue_access_token(user_id, "ADMIN").unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "ADMIN");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let config = test_config();
        assert!(config.validate_access_token("not.a.token").is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let config = test_config();
        let other = JwtConfig::new("a-completely-different-secret-value", 3600, 30);

        let token = config.issue_access_token(Uuid::new_v4(), "USER").unwrap();
        assert!(other.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_validate_rejects_expired() {
        let config = JwtConfig::new("test-secret-at-least-32-bytes-long!!", -120, 0);
        let token = config.issue_access_token(Uuid::new_v4(), "USER").unwrap();
        assert!(config.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_tokens_have_unique_jti() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let a = config.issue_access_token(user_id, "USER").unwrap();
        let b = config.issue_access_token(user_id, "USER").unwrap();

        let ca = config.validate_access_token(&a).unwrap();
        let cb = config.validate_access_token(&b).unwrap();
        assert_ne!(ca.jti, cb.jti);
    }
}
