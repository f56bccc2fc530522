use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: Uuid,
    /// Session id, checked against the `sessions` table on every request
    pub sid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 session tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: Uuid, session_id: Uuid, expires_at: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims {
            sub: user_id,
            sid: session_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Auth(format!("Invalid session token: {}", e)))
    }
}

/// Creates a random password reset token, returning it with its stored digest
pub fn generate_reset_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let digest = hash_reset_token(&token);
    (token, digest)
}

/// SHA-256 hex digest under which a reset token is stored
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes!!";

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(SECRET);
        let (user_id, session_id) = (Uuid::new_v4(), Uuid::new_v4());

        let token = service
            .issue(user_id, session_id, Utc::now() + Duration::hours(1))
            .unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.sid, session_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new(SECRET);
        let token = service
            .issue(Uuid::new_v4(), Uuid::new_v4(), Utc::now() - Duration::minutes(5))
            .unwrap();

        assert!(matches!(service.verify(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = TokenService::new(SECRET)
            .issue(Uuid::new_v4(), Uuid::new_v4(), Utc::now() + Duration::hours(1))
            .unwrap();

        let other = TokenService::new("another-secret-that-is-32-bytes-long!!");
        assert!(other.verify(&token).is_err());
        assert!(other.verify("garbage").is_err());
    }

    #[test]
    fn test_reset_token_digest() {
        let (token, digest) = generate_reset_token();
        assert_eq!(token.len(), 64);
        assert_eq!(digest, hash_reset_token(&token));
        assert_ne!(digest, token);
    }
}
