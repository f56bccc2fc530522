use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tokio::task;

use crate::core::error::{AppError, Result};

/// Hashes a password with Argon2id and a random salt (PHC string format).
/// Runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_owned();
    task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Verifies a password against a stored PHC hash on the blocking pool
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let (password, hash) = (password.to_owned(), hash.to_owned());
    task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
}

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("secret123").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_salts_differ() {
        assert_ne!(
            hash_password("same").await.unwrap(),
            hash_password("same").await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_garbage_hash_is_error() {
        assert!(verify_password("x", "not-a-hash").await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_leaves_runtime_free() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        // On a single-threaded runtime the ticker only advances while the
        // hash runs on another thread
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let ticker = tokio::spawn(async move {
            loop {
                counter.fetch_add(1, Ordering::Relaxed);
                tokio::task::yield_now().await;
            }
        });

        let hash = hash_password("secret123").await.unwrap();
        ticker.abort();

        assert!(hash.starts_with("$argon2"));
        assert!(ticks.load(Ordering::Relaxed) > 0);
    }
}
