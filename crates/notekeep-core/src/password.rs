//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`). Both functions
//! are CPU-bound; async callers should run them on the blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{CoreError, CoreResult};

pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(format!("failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

/// Returns `Ok(false)` on mismatch and `Err` only if the stored hash is malformed.
pub fn verify_password(hash: &str, password: &str) -> CoreResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| CoreError::PasswordHash(format!("invalid password hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Runs [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: String) -> CoreResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?
}

/// Runs [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(hash: String, password: String) -> CoreResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("StrongPass1!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "StrongPass1!").unwrap());
        assert!(!verify_password(&hash, "WrongPass1!").unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("StrongPass1!").unwrap();
        let b = hash_password("StrongPass1!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = verify_password("not-a-hash", "whatever").unwrap_err();
        assert!(matches!(err, CoreError::PasswordHash(_)));
    }

    #[tokio::test]
    async fn blocking_variants_agree() {
        let hash = hash_password_blocking("StrongPass1!".to_string())
            .await
            .unwrap();
        assert!(verify_password_blocking(hash, "StrongPass1!".to_string())
            .await
            .unwrap());
    }
}
